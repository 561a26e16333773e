// Where each board sits in the window.
// Boards are tiled left-to-right, top-to-bottom with a gap around every tile;
// a status strip runs along the bottom.

use crate::types::Point;

pub const STATUS_HEIGHT: usize = 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub boards: usize,
    pub columns: usize,
    pub board_width: usize,
    pub board_height: usize,
    pub gap: usize,
}

impl Layout {
    pub fn new(boards: usize, columns: usize, board_width: usize, board_height: usize, gap: usize) -> Self {
        Self {
            boards,
            columns: columns.clamp(1, boards.max(1)),
            board_width,
            board_height,
            gap,
        }
    }

    pub fn rows(&self) -> usize {
        self.boards.div_ceil(self.columns).max(1)
    }

    /// Window size in pixels, status strip included.
    pub fn window_size(&self) -> (usize, usize) {
        let w = self.columns * self.board_width + (self.columns + 1) * self.gap;
        let h = self.rows() * self.board_height + (self.rows() + 1) * self.gap + STATUS_HEIGHT;
        (w, h)
    }

    /// Top-left corner of board `index` in window pixels.
    pub fn origin(&self, index: usize) -> (usize, usize) {
        let col = index % self.columns;
        let row = index / self.columns;
        (
            self.gap + col * (self.board_width + self.gap),
            self.gap + row * (self.board_height + self.gap),
        )
    }

    /// Top edge of the status strip.
    pub fn status_top(&self) -> usize {
        self.window_size().1 - STATUS_HEIGHT
    }

    /// Which board is under the window position, and where on that board.
    pub fn hit(&self, x: f32, y: f32) -> Option<(usize, Point)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        (0..self.boards).find_map(|index| {
            let (ox, oy) = self.origin(index);
            let lx = x - ox as f32;
            let ly = y - oy as f32;
            let inside = lx >= 0.0 && ly >= 0.0 && lx < self.board_width as f32 && ly < self.board_height as f32;
            inside.then(|| (index, Point::new(lx, ly)))
        })
    }
}
