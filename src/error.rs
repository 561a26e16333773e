// One error type for the whole app.
// Every variant states *where* things went wrong.
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    // Board index outside [0, N)
    #[error("board index {index} out of range (have {count} boards)")]
    OutOfRange { index: usize, count: usize },

    // Shade name that is not in the colour table
    #[error("unknown shade '{0}'")]
    UnknownShade(String),

    // begin/extend/end called in the wrong order; never shown to the user
    #[error("invalid stroke state: {0}")]
    InvalidStrokeState(&'static str),

    // Copying a board for the history failed (allocation)
    #[error("could not capture board {board}: {reason}")]
    SurfaceCapture { board: usize, reason: String },

    // A board's pixel buffer does not match its width * height
    #[error("board {board} surface is corrupt: expected {expected} pixels, found {found}")]
    SurfaceMismatch {
        board: usize,
        expected: usize,
        found: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),

    // Creating the window failed
    #[error("window init error: {0}")]
    WindowInit(String),

    // Updating the window buffer failed
    #[error("window update error: {0}")]
    WindowUpdate(String),
}
