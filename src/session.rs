// The event-processing core.
// Pointer events, toolbar commands and clock time all enter through the three
// `handle_*`/`advance` methods below and each runs to completion before the
// next one is looked at; nothing here is shared with another thread.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::boards::BoardSet;
use crate::error::{Error, Result};
use crate::history::History;
use crate::idle::{IdleAction, IdleMonitor};
use crate::palette::{Palette, Shade};
use crate::stroke::{DrawState, StrokeRecorder};
use crate::types::Point;

/// Normalised pointer input, already in board-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Press(Point),
    Move(Point),
    Release,
    Leave,
}

/// Toolbar and prompt actions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    SetShade(Shade),
    SetWidth(u32),
    Clear,
    Undo,
    /// Open the welcome prompt.
    ShowHelp,
    /// Close the top-most prompt (welcome before inactivity).
    Dismiss,
    /// Wipe everything from the inactivity prompt and start again.
    StartOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    Welcome,
    Inactivity,
}

/// Which prompts are currently on screen. At most one of each kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Prompts {
    pub welcome: bool,
    pub inactivity: bool,
}

impl Prompts {
    pub fn is_open(&self, kind: PromptKind) -> bool {
        match kind {
            PromptKind::Welcome => self.welcome,
            PromptKind::Inactivity => self.inactivity,
        }
    }

    pub fn any(&self) -> bool {
        self.welcome || self.inactivity
    }

    fn set(&mut self, kind: PromptKind, open: bool) {
        match kind {
            PromptKind::Welcome => self.welcome = open,
            PromptKind::Inactivity => self.inactivity = open,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub board_width: usize,
    pub board_height: usize,
    pub max_states: usize,
    pub idle_timeout_secs: u32,
    pub draw_state: DrawState,
}

pub struct Session {
    boards: BoardSet,
    recorder: StrokeRecorder,
    history: History,
    idle: IdleMonitor,
    prompts: Prompts,
    can_undo: Rc<Cell<bool>>,
    notice: Option<String>,
}

impl Session {
    /// Paint the boards with their backgrounds and commit that as the baseline.
    pub fn new(palette: Palette, settings: &SessionSettings) -> Result<Self> {
        let boards = BoardSet::new(palette, settings.board_width, settings.board_height);
        let mut history = History::new(settings.max_states);

        let can_undo = Rc::new(Cell::new(false));
        let flag = Rc::clone(&can_undo);
        history.set_listener(Box::new(move |value| flag.set(value)));
        history.commit(&boards)?;

        Ok(Self {
            boards,
            recorder: StrokeRecorder::new(settings.draw_state),
            history,
            idle: IdleMonitor::new(settings.idle_timeout_secs),
            prompts: Prompts::default(),
            can_undo,
            notice: None,
        })
    }

    pub fn boards(&self) -> &BoardSet {
        &self.boards
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn idle(&self) -> &IdleMonitor {
        &self.idle
    }

    pub fn prompts(&self) -> Prompts {
        self.prompts
    }

    pub fn draw_state(&self) -> DrawState {
        self.recorder.draw_state()
    }

    pub fn stroke_open(&self) -> bool {
        self.recorder.is_open()
    }

    /// Last value pushed by the history's change listener.
    pub fn can_undo(&self) -> bool {
        self.can_undo.get()
    }

    /// Non-fatal failure message for the user, cleared by the next good save.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        if self.prompts.is_open(kind) {
            return;
        }
        debug!(?kind, "show prompt");
        self.prompts.set(kind, true);
        if kind == PromptKind::Welcome {
            self.idle.suspend();
        }
    }

    fn close_prompt(&mut self, kind: PromptKind) {
        if !self.prompts.is_open(kind) {
            return;
        }
        debug!(?kind, "close prompt");
        self.prompts.set(kind, false);
        match kind {
            // Dismissing welcome answers an inactivity prompt underneath it too.
            PromptKind::Welcome => {
                self.prompts.set(PromptKind::Inactivity, false);
                self.idle.resume();
            }
            PromptKind::Inactivity => self.idle.prompt_dismissed(),
        }
    }

    /// Stroke activity: back to Active, taking the inactivity prompt down with it.
    fn touch(&mut self) {
        self.idle.touch();
        self.close_prompt(PromptKind::Inactivity);
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        // The welcome prompt covers the boards.
        if self.prompts.welcome && matches!(event, InputEvent::Press(_) | InputEvent::Move(_)) {
            trace!(?event, "input ignored under welcome prompt");
            return Ok(());
        }

        match event {
            InputEvent::Press(point) => {
                self.touch();
                if let Err(err) = self.recorder.begin(point) {
                    trace!(%err, "press ignored");
                }
                Ok(())
            }
            InputEvent::Move(point) => {
                let segment = match self.recorder.extend(point) {
                    Ok(segment) => segment,
                    Err(err) => {
                        trace!(%err, "move ignored");
                        return Ok(());
                    }
                };
                self.touch();
                let result = self.boards.render_segment(
                    Some(segment.from),
                    segment.to,
                    segment.shade,
                    segment.width as f32,
                );
                debug_assert!(
                    !matches!(result, Err(Error::OutOfRange { .. })),
                    "palette does not cover every board: {result:?}"
                );
                result
            }
            InputEvent::Release | InputEvent::Leave => {
                let summary = match self.recorder.end() {
                    Ok(summary) => summary,
                    Err(err) => {
                        trace!(%err, ?event, "stroke end ignored");
                        return Ok(());
                    }
                };
                if summary.is_click() {
                    debug!("click without drag, nothing to save");
                    return Ok(());
                }
                self.commit()
            }
        }
    }

    fn commit(&mut self) -> Result<()> {
        match self.history.commit(&self.boards) {
            Ok(()) => {
                self.notice = None;
                Ok(())
            }
            Err(err) => Err(self.surface_failure(err)),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.recorder.cancel();
        match self.history.reset(&mut self.boards) {
            Ok(()) => {
                self.notice = None;
                Ok(())
            }
            Err(err) => Err(self.surface_failure(err)),
        }
    }

    fn surface_failure(&mut self, err: Error) -> Error {
        warn!(%err, "history not updated");
        self.notice = Some(format!("Undo unavailable for this change: {err}"));
        err
    }

    pub fn handle_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::SetShade(shade) => self.recorder.set_shade(shade),
            Command::SetWidth(width) => self.recorder.set_width(width),
            Command::Clear => {
                self.reset()?;
                self.touch();
            }
            Command::Undo => {
                if self.recorder.is_open() {
                    trace!("undo ignored while a stroke is open");
                } else {
                    self.history.undo(&mut self.boards);
                }
            }
            Command::ShowHelp => self.open_prompt(PromptKind::Welcome),
            Command::Dismiss => {
                if self.prompts.welcome {
                    self.close_prompt(PromptKind::Welcome);
                } else {
                    self.close_prompt(PromptKind::Inactivity);
                }
            }
            Command::StartOver => {
                if !self.prompts.inactivity {
                    trace!("start over ignored without the inactivity prompt");
                    return Ok(());
                }
                self.close_prompt(PromptKind::Inactivity);
                self.reset()?;
                self.open_prompt(PromptKind::Welcome);
            }
        }
        Ok(())
    }

    /// Feed clock time to the idle monitor and carry out what it asks for,
    /// one tick at a time.
    pub fn advance(&mut self, dt: Duration) -> Result<()> {
        let due = self.idle.accumulate(dt);
        for _ in 0..due {
            match self.idle.tick(self.recorder.is_open()) {
                None => {}
                Some(IdleAction::ShowPrompt) => self.open_prompt(PromptKind::Inactivity),
                Some(IdleAction::ForceReset) => {
                    self.prompts.set(PromptKind::Inactivity, false);
                    let result = self.reset();
                    self.open_prompt(PromptKind::Welcome);
                    result?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idle::IdlePhase;
    use crate::types::FrameBuffer;

    const TIMEOUT: u32 = 60;

    fn session() -> Session {
        let settings = SessionSettings {
            board_width: 48,
            board_height: 36,
            max_states: 10,
            idle_timeout_secs: TIMEOUT,
            draw_state: DrawState { shade: Shade::Dark, width: 4 },
        };
        Session::new(Palette::default(), &settings).unwrap()
    }

    fn stroke(s: &mut Session, from: (f32, f32), to: (f32, f32)) {
        s.handle_input(InputEvent::Press(Point::new(from.0, from.1))).unwrap();
        s.handle_input(InputEvent::Move(Point::new(to.0, to.1))).unwrap();
        s.handle_input(InputEvent::Release).unwrap();
    }

    fn surfaces(s: &Session) -> Vec<FrameBuffer> {
        s.boards().iter().map(|b| b.surface.clone()).collect()
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn startup_shows_backgrounds_with_one_history_entry() {
        let s = session();
        assert_eq!(s.boards().len(), 6);
        assert_eq!(s.history().len(), 1);
        assert!(!s.can_undo());
        for board in s.boards().iter() {
            assert!(board.surface.pixels.iter().all(|&p| p == board.background()));
        }
    }

    #[test]
    fn one_stroke_draws_on_every_board_and_commits() {
        let mut s = session();
        stroke(&mut s, (10.0, 10.0), (20.0, 20.0));
        assert_eq!(s.history().len(), 2);
        assert!(s.can_undo());
        for board in s.boards().iter() {
            let ink = s.boards().palette().resolve(board.index(), Shade::Dark).unwrap();
            assert_eq!(board.surface.pixel(10, 10), Some(ink));
            assert_eq!(board.surface.pixel(15, 15), Some(ink));
            assert_eq!(board.surface.pixel(19, 19), Some(ink));
            assert_eq!(board.surface.pixel(40, 5), Some(board.background()));
        }
    }

    #[test]
    fn undo_returns_to_state_after_previous_stroke() {
        let mut s = session();
        stroke(&mut s, (5.0, 5.0), (10.0, 5.0));
        stroke(&mut s, (5.0, 15.0), (10.0, 15.0));
        let after_second = surfaces(&s);
        stroke(&mut s, (5.0, 25.0), (10.0, 25.0));
        assert_eq!(s.history().len(), 4);

        s.handle_command(Command::Undo).unwrap();
        assert_eq!(s.history().len(), 3);
        assert_eq!(surfaces(&s), after_second);
    }

    #[test]
    fn undo_at_baseline_changes_nothing() {
        let mut s = session();
        let before = surfaces(&s);
        s.handle_command(Command::Undo).unwrap();
        assert_eq!(s.history().len(), 1);
        assert_eq!(surfaces(&s), before);
    }

    #[test]
    fn stray_moves_change_nothing() {
        let mut s = session();
        let before = surfaces(&s);
        s.handle_input(InputEvent::Move(Point::new(3.0, 3.0))).unwrap();
        s.handle_input(InputEvent::Move(Point::new(9.0, 9.0))).unwrap();
        s.handle_input(InputEvent::Release).unwrap();
        assert_eq!(surfaces(&s), before);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn click_without_drag_does_not_use_a_history_slot() {
        let mut s = session();
        let before = surfaces(&s);
        s.handle_input(InputEvent::Press(Point::new(12.0, 12.0))).unwrap();
        s.handle_input(InputEvent::Release).unwrap();
        assert_eq!(s.history().len(), 1);
        assert_eq!(surfaces(&s), before);
    }

    #[test]
    fn leave_commits_like_release() {
        let mut s = session();
        s.handle_input(InputEvent::Press(Point::new(2.0, 2.0))).unwrap();
        s.handle_input(InputEvent::Move(Point::new(8.0, 8.0))).unwrap();
        s.handle_input(InputEvent::Leave).unwrap();
        assert_eq!(s.history().len(), 2);
        assert!(!s.stroke_open());
    }

    #[test]
    fn history_is_capped() {
        let mut s = session();
        for i in 0..15 {
            let y = 2.0 + i as f32 * 2.0;
            stroke(&mut s, (2.0, y), (30.0, y));
            assert!(s.history().len() <= 10);
        }
        assert_eq!(s.history().len(), 10);
    }

    #[test]
    fn shade_and_width_apply_to_following_samples() {
        let mut s = session();
        s.handle_command(Command::SetShade(Shade::Light)).unwrap();
        s.handle_command(Command::SetWidth(10)).unwrap();
        stroke(&mut s, (20.0, 18.0), (21.0, 18.0));
        let board = s.boards().get(2).unwrap();
        let light = s.boards().palette().resolve(2, Shade::Light).unwrap();
        assert_eq!(board.surface.pixel(20, 14), Some(light));
        assert_eq!(s.draw_state().width, 10);
    }

    #[test]
    fn moving_resets_idle_time() {
        let mut s = session();
        s.advance(secs(30)).unwrap();
        assert_eq!(s.idle().elapsed(), 30);
        s.handle_input(InputEvent::Press(Point::new(1.0, 1.0))).unwrap();
        s.advance(secs(5)).unwrap();
        s.handle_input(InputEvent::Move(Point::new(4.0, 4.0))).unwrap();
        assert_eq!(s.idle().elapsed(), 0);
    }

    #[test]
    fn idle_timeout_shows_inactivity_prompt() {
        let mut s = session();
        s.advance(secs(TIMEOUT as u64)).unwrap();
        assert!(!s.prompts().inactivity);
        s.advance(secs(1)).unwrap();
        assert!(s.prompts().inactivity);
        assert_eq!(s.idle().phase(), IdlePhase::PromptShown);
    }

    #[test]
    fn no_inactivity_prompt_while_welcome_is_open() {
        let mut s = session();
        s.handle_command(Command::ShowHelp).unwrap();
        s.advance(secs(TIMEOUT as u64 * 3)).unwrap();
        assert!(!s.prompts().inactivity);
        assert_eq!(s.idle().phase(), IdlePhase::Active);
        assert_eq!(s.idle().elapsed(), TIMEOUT * 3);

        s.handle_command(Command::Dismiss).unwrap();
        assert!(!s.prompts().welcome);
        assert_eq!(s.idle().elapsed(), 0);
    }

    #[test]
    fn ignored_prompt_wipes_the_boards_once() {
        let mut s = session();
        stroke(&mut s, (5.0, 5.0), (25.0, 25.0));
        stroke(&mut s, (5.0, 25.0), (25.0, 5.0));
        assert_eq!(s.history().len(), 3);

        let resets = Rc::new(Cell::new(0));
        let counter = Rc::clone(&resets);
        let flag = Rc::clone(&s.can_undo);
        s.history.set_listener(Box::new(move |can_undo| {
            if !can_undo {
                counter.set(counter.get() + 1);
            }
            flag.set(can_undo);
        }));

        s.advance(secs(TIMEOUT as u64 + 1)).unwrap();
        assert!(s.prompts().inactivity);
        s.advance(secs(TIMEOUT as u64 + 1)).unwrap();

        assert_eq!(resets.get(), 1);
        assert_eq!(s.history().len(), 1);
        assert!(!s.prompts().inactivity);
        assert!(s.prompts().welcome);
        assert_eq!(s.idle().phase(), IdlePhase::Active);
        for board in s.boards().iter() {
            assert!(board.surface.pixels.iter().all(|&p| p == board.background()));
        }

        // Welcome now suspends the timer: no further prompts or resets
        s.advance(secs(TIMEOUT as u64 * 5)).unwrap();
        assert_eq!(resets.get(), 1);
        assert!(!s.prompts().inactivity);
    }

    #[test]
    fn dismissing_inactivity_prompt_restarts_timer() {
        let mut s = session();
        s.advance(secs(TIMEOUT as u64 + 1)).unwrap();
        s.advance(secs(10)).unwrap();
        s.handle_command(Command::Dismiss).unwrap();
        assert!(!s.prompts().inactivity);
        assert_eq!(s.idle().phase(), IdlePhase::Active);
        assert_eq!(s.idle().elapsed(), 0);
    }

    #[test]
    fn pressing_the_boards_dismisses_inactivity_prompt() {
        let mut s = session();
        s.advance(secs(TIMEOUT as u64 + 1)).unwrap();
        assert!(s.prompts().inactivity);
        s.handle_input(InputEvent::Press(Point::new(3.0, 3.0))).unwrap();
        assert!(!s.prompts().inactivity);
        assert!(s.stroke_open());
        assert_eq!(s.idle().phase(), IdlePhase::Active);
    }

    #[test]
    fn welcome_prompt_blocks_drawing() {
        let mut s = session();
        s.handle_command(Command::ShowHelp).unwrap();
        let before = surfaces(&s);
        stroke(&mut s, (5.0, 5.0), (20.0, 20.0));
        assert_eq!(surfaces(&s), before);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn open_stroke_blocks_forced_reset() {
        let mut s = session();
        s.advance(secs(TIMEOUT as u64 + 1)).unwrap();
        // Stroke started by some path that did not go through touch, e.g. a
        // press delivered before the prompt appeared.
        s.recorder.begin(Point::new(1.0, 1.0)).unwrap();
        s.advance(secs(TIMEOUT as u64 * 2)).unwrap();
        assert_eq!(s.idle().phase(), IdlePhase::PromptShown);
        assert!(s.prompts().inactivity);
    }

    #[test]
    fn clear_resets_history_and_timer() {
        let mut s = session();
        stroke(&mut s, (5.0, 5.0), (20.0, 20.0));
        s.advance(secs(20)).unwrap();
        s.handle_command(Command::Clear).unwrap();
        assert_eq!(s.history().len(), 1);
        assert!(!s.can_undo());
        assert_eq!(s.idle().elapsed(), 0);
        assert!(!s.prompts().welcome);
    }

    #[test]
    fn start_over_clears_and_shows_welcome() {
        let mut s = session();
        stroke(&mut s, (5.0, 5.0), (20.0, 20.0));
        s.advance(secs(TIMEOUT as u64 + 1)).unwrap();
        s.handle_command(Command::StartOver).unwrap();
        assert_eq!(s.history().len(), 1);
        assert!(!s.prompts().inactivity);
        assert!(s.prompts().welcome);
        assert!(s.idle().is_suspended());
    }

    #[test]
    fn start_over_needs_the_inactivity_prompt() {
        let mut s = session();
        stroke(&mut s, (5.0, 5.0), (20.0, 20.0));
        stroke(&mut s, (5.0, 20.0), (20.0, 5.0));
        let before = surfaces(&s);

        s.handle_command(Command::StartOver).unwrap();
        assert_eq!(s.history().len(), 3);
        assert!(s.can_undo());
        assert_eq!(surfaces(&s), before);
        assert!(!s.prompts().any());
    }

    #[test]
    fn clear_under_inactivity_prompt_closes_it() {
        let mut s = session();
        stroke(&mut s, (5.0, 5.0), (20.0, 20.0));
        s.advance(secs(TIMEOUT as u64 + 1)).unwrap();
        assert!(s.prompts().inactivity);

        s.handle_command(Command::Clear).unwrap();
        assert!(!s.prompts().inactivity);
        assert_eq!(s.idle().phase(), IdlePhase::Active);
        assert_eq!(s.idle().elapsed(), 0);
        assert_eq!(s.history().len(), 1);

        // A full timeout later the prompt comes back rather than a wipe.
        s.advance(secs(TIMEOUT as u64 + 1)).unwrap();
        assert!(s.prompts().inactivity);
        assert!(!s.prompts().welcome);
    }

    #[test]
    fn dismissing_help_over_inactivity_prompt_closes_both() {
        let mut s = session();
        s.advance(secs(TIMEOUT as u64 + 1)).unwrap();
        s.handle_command(Command::ShowHelp).unwrap();
        assert!(s.prompts().welcome && s.prompts().inactivity);

        s.handle_command(Command::Dismiss).unwrap();
        assert!(!s.prompts().any());
        assert_eq!(s.idle().phase(), IdlePhase::Active);
        assert!(!s.idle().is_suspended());
        assert_eq!(s.idle().elapsed(), 0);
    }

    #[test]
    fn undo_ignored_mid_stroke() {
        let mut s = session();
        stroke(&mut s, (5.0, 5.0), (20.0, 20.0));
        s.handle_input(InputEvent::Press(Point::new(30.0, 30.0))).unwrap();
        s.handle_input(InputEvent::Move(Point::new(40.0, 30.0))).unwrap();
        s.handle_command(Command::Undo).unwrap();
        assert_eq!(s.history().len(), 2);
        s.handle_input(InputEvent::Release).unwrap();
        assert_eq!(s.history().len(), 3);
    }
}
