//! Multi-panel drawing: one pointer stroke replayed on N boards, each in its
//! own palette colour, with bounded undo and an inactivity wipe.

pub mod boards;
pub mod config;
pub mod draw;
pub mod error;
pub mod history;
pub mod idle;
pub mod input;
pub mod layout;
pub mod logging;
pub mod palette;
pub mod raster;
pub mod session;
pub mod stroke;
pub mod types;
