// Bounded undo history of whole-board snapshots.
// Newest entry at the front. After startup the length is always in
// 1..=max_states; the front entry is what the boards currently show.

use std::collections::VecDeque;

use tracing::{info, warn};

use crate::boards::BoardSet;
use crate::error::Result;
use crate::types::FrameBuffer;

pub const MAX_STATES: usize = 10;
/// Largest history a config file may ask for.
pub const MAX_STATES_LIMIT: usize = 100;

/// Called with `can_undo` after every commit, undo and reset.
pub type HistoryListener = Box<dyn FnMut(bool)>;

/// One surface copy per board, in board order.
pub struct Snapshot {
    /// Commit counter at capture time; 0 is the first commit of the session.
    pub seq: u64,
    pub surfaces: Vec<FrameBuffer>,
}

pub struct History {
    entries: VecDeque<Snapshot>,
    max_states: usize,
    next_seq: u64,
    listener: Option<HistoryListener>,
}

impl History {
    pub fn new(max_states: usize) -> Self {
        let max_states = max_states.max(1);
        Self {
            entries: VecDeque::new(),
            max_states,
            next_seq: 0,
            listener: None,
        }
    }

    pub fn set_listener(&mut self, listener: HistoryListener) {
        self.listener = Some(listener);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn max_states(&self) -> usize {
        self.max_states
    }

    pub fn can_undo(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn newest(&self) -> Option<&Snapshot> {
        self.entries.front()
    }

    pub fn oldest(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    fn notify(&mut self) {
        let can_undo = self.can_undo();
        if let Some(listener) = self.listener.as_mut() {
            listener(can_undo);
        }
    }

    /// Capture all boards and push the copy as the newest entry, evicting the
    /// oldest entries beyond `max_states`. A failed capture leaves the history
    /// exactly as it was.
    pub fn commit(&mut self, boards: &BoardSet) -> Result<()> {
        let surfaces = boards.capture()?;
        self.push(surfaces);
        self.notify();
        info!(states = self.entries.len(), "saved state");
        Ok(())
    }

    fn push(&mut self, surfaces: Vec<FrameBuffer>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_front(Snapshot { seq, surfaces });
        self.entries.truncate(self.max_states);
    }

    /// Drop the newest entry and show the one before it.
    /// Returns false (and does nothing) when only the baseline is left.
    pub fn undo(&mut self, boards: &mut BoardSet) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.entries.pop_front();
        if let Some(previous) = self.entries.front() {
            boards.restore(&previous.surfaces);
        }
        self.notify();
        info!(states = self.entries.len(), "undo state");
        true
    }

    /// Paint every board with its background and make that the only entry.
    /// If the blank boards cannot be captured the boards are put back to the
    /// newest entry and the history is left alone.
    pub fn reset(&mut self, boards: &mut BoardSet) -> Result<()> {
        boards.fill_backgrounds();
        let surfaces = match boards.capture() {
            Ok(surfaces) => surfaces,
            Err(err) => {
                warn!(%err, "reset could not capture blank boards");
                if let Some(current) = self.entries.front() {
                    boards.restore(&current.surfaces);
                }
                return Err(err);
            }
        };
        self.entries.clear();
        self.push(surfaces);
        self.notify();
        info!(states = self.entries.len(), "history reset");
        Ok(())
    }
}
