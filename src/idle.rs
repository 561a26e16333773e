// Inactivity state machine.
//
//   Active --(elapsed > timeout)--> PromptShown        emits ShowPrompt
//   PromptShown --(dismissed)--> Active
//   PromptShown --(elapsed > timeout again)--> Active  emits ForceReset
//   any --(stroke activity / explicit reset)--> Active
//
// Time arrives as wall-clock durations and is turned into whole one-second
// ticks here. Every entry into Active (and into PromptShown) starts a fresh
// timer: elapsed goes to zero and any partial second is thrown away.

use std::time::Duration;

use tracing::debug;

pub const IDLE_TIMEOUT_SECS: u32 = 60;
const TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdlePhase {
    Active,
    PromptShown,
}

/// Side effects the owner of the monitor has to carry out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdleAction {
    ShowPrompt,
    ForceReset,
}

#[derive(Debug)]
pub struct IdleMonitor {
    timeout: u32,
    elapsed: u32,
    phase: IdlePhase,
    suspended: bool,
    carry: Duration,
}

impl IdleMonitor {
    pub fn new(timeout_secs: u32) -> Self {
        Self {
            timeout: timeout_secs,
            elapsed: 0,
            phase: IdlePhase::Active,
            suspended: false,
            carry: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> IdlePhase {
        self.phase
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn timeout(&self) -> u32 {
        self.timeout
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Stop the old timer and start a fresh one in Active.
    pub fn restart(&mut self) {
        self.phase = IdlePhase::Active;
        self.elapsed = 0;
        self.carry = Duration::ZERO;
    }

    /// Stroke activity. Same as [`IdleMonitor::restart`]; returns true when it
    /// pulled the machine out of PromptShown so the caller can close the prompt.
    pub fn touch(&mut self) -> bool {
        let was_prompting = self.phase == IdlePhase::PromptShown;
        self.restart();
        was_prompting
    }

    /// The welcome prompt opened: ticks keep counting but cannot fire.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// The welcome prompt closed: resume with a fresh timer.
    pub fn resume(&mut self) {
        self.suspended = false;
        self.restart();
    }

    /// The user dismissed the inactivity prompt.
    pub fn prompt_dismissed(&mut self) {
        if self.phase == IdlePhase::PromptShown && !self.suspended {
            self.restart();
        }
    }

    /// Add wall-clock time; returns how many whole ticks are now due.
    /// Call [`IdleMonitor::tick`] that many times, handling each action
    /// before the next tick.
    pub fn accumulate(&mut self, dt: Duration) -> u32 {
        self.carry += dt;
        let mut due = 0;
        while self.carry >= TICK {
            self.carry -= TICK;
            due += 1;
        }
        due
    }

    /// One second passed. `stroke_open` blocks the destructive reset.
    pub fn tick(&mut self, stroke_open: bool) -> Option<IdleAction> {
        self.elapsed = self.elapsed.saturating_add(1);
        if self.suspended || self.elapsed <= self.timeout {
            return None;
        }
        match self.phase {
            IdlePhase::Active => {
                debug!(elapsed = self.elapsed, "idle timeout, showing prompt");
                self.restart();
                self.phase = IdlePhase::PromptShown;
                Some(IdleAction::ShowPrompt)
            }
            IdlePhase::PromptShown if stroke_open => {
                debug!("idle prompt ignored but a stroke is open, not resetting");
                None
            }
            IdlePhase::PromptShown => {
                debug!("idle prompt ignored, forcing reset");
                self.restart();
                Some(IdleAction::ForceReset)
            }
        }
    }
}
