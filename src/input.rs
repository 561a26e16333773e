// Turns polled mouse/keyboard state into session events.
// The window only tells us "button down?" and "where?" once per frame; the
// press/move/release/leave vocabulary is rebuilt here by comparing frames.

use minifb::Key;

use crate::palette::Shade;
use crate::session::{Command, InputEvent};
use crate::types::Point;

#[derive(Debug, Default)]
pub struct PointerTracker {
    was_down: bool,
    active: Option<usize>,
    last: Option<Point>,
}

impl PointerTracker {
    /// Board the open stroke started on, if any.
    pub fn active_board(&self) -> Option<usize> {
        self.active
    }

    /// Feed one frame of pointer state. `hit` is the board under the pointer
    /// and the board-local position, or `None` when over no board.
    pub fn update(&mut self, down: bool, hit: Option<(usize, Point)>) -> Option<InputEvent> {
        let event = match self.active {
            Some(_) if !down => {
                self.active = None;
                Some(InputEvent::Release)
            }
            Some(board) => match hit {
                Some((over, point)) if over == board => {
                    if self.last == Some(point) {
                        None
                    } else {
                        self.last = Some(point);
                        Some(InputEvent::Move(point))
                    }
                }
                _ => {
                    self.active = None;
                    Some(InputEvent::Leave)
                }
            },
            // A stroke only starts on the frame the button goes down
            None => match hit {
                Some((board, point)) if down && !self.was_down => {
                    self.active = Some(board);
                    self.last = Some(point);
                    Some(InputEvent::Press(point))
                }
                _ => None,
            },
        };
        self.was_down = down;
        event
    }
}

/// Toolbar key bindings. Number keys pick from `sizes` (1 = first).
/// Escape is not mapped; the window loop owns quitting.
pub fn command_for_key(key: Key, sizes: &[u32]) -> Option<Command> {
    let size = |n: usize| sizes.get(n).copied().map(Command::SetWidth);
    match key {
        Key::D => Some(Command::SetShade(Shade::Dark)),
        Key::L => Some(Command::SetShade(Shade::Light)),
        Key::C => Some(Command::Clear),
        Key::U | Key::Backspace => Some(Command::Undo),
        Key::H => Some(Command::ShowHelp),
        Key::Enter | Key::Space => Some(Command::Dismiss),
        Key::R => Some(Command::StartOver),
        Key::Key1 => size(0),
        Key::Key2 => size(1),
        Key::Key3 => size(2),
        Key::Key4 => size(3),
        Key::Key5 => size(4),
        Key::Key6 => size(5),
        Key::Key7 => size(6),
        Key::Key8 => size(7),
        Key::Key9 => size(8),
        _ => None,
    }
}
