// The N synchronized drawing boards.
// Every board owns one surface and a fixed index into the palette; the index is
// assigned once here and never re-derived from anything else.

use crate::error::{Error, Result};
use crate::palette::{Palette, Shade};
use crate::raster::stroke_segment;
use crate::types::{FrameBuffer, Point};

pub struct Board {
    index: usize,
    background: u32,
    pub surface: FrameBuffer,
}

impl Board {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    fn check_surface(&self) -> Result<()> {
        let expected = self.surface.expected_len();
        let found = self.surface.pixels.len();
        if expected != found {
            return Err(Error::SurfaceMismatch { board: self.index, expected, found });
        }
        Ok(())
    }
}

pub struct BoardSet {
    palette: Palette,
    boards: Vec<Board>,
}

impl BoardSet {
    /// One board per palette column, each painted with its background.
    pub fn new(palette: Palette, width: usize, height: usize) -> Self {
        let boards = (0..palette.len())
            .map(|index| {
                let background = palette.background(index).unwrap_or(0);
                Board {
                    index,
                    background,
                    surface: FrameBuffer::filled(width, height, background),
                }
            })
            .collect();
        Self { palette, boards }
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn get(&self, index: usize) -> Result<&Board> {
        self.boards
            .get(index)
            .ok_or(Error::OutOfRange { index, count: self.boards.len() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Board> {
        self.boards.iter()
    }

    /// Draw one segment on every board in that board's ink for `shade`.
    /// `from == None` draws a dot at `to`.
    ///
    /// All colours and surfaces are checked before the first pixel is written,
    /// so a failure leaves every board untouched.
    pub fn render_segment(&mut self, from: Option<Point>, to: Point, shade: Shade, width: f32) -> Result<()> {
        let mut inks = Vec::with_capacity(self.boards.len());
        for board in &self.boards {
            board.check_surface()?;
            inks.push(self.palette.resolve(board.index, shade)?);
        }

        let from = from.unwrap_or(to);
        for (board, ink) in self.boards.iter_mut().zip(inks) {
            stroke_segment(&mut board.surface, from, to, width, ink);
        }
        Ok(())
    }

    /// Repaint every board with its own background colour.
    pub fn fill_backgrounds(&mut self) {
        for board in &mut self.boards {
            board.surface.fill(board.background);
        }
    }

    /// Copy every surface, in board order.
    pub fn capture(&self) -> Result<Vec<FrameBuffer>> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.boards.len())
            .map_err(|e| Error::SurfaceCapture { board: 0, reason: e.to_string() })?;
        for board in &self.boards {
            let copy = board
                .surface
                .try_clone()
                .map_err(|e| Error::SurfaceCapture { board: board.index, reason: e.to_string() })?;
            out.push(copy);
        }
        Ok(out)
    }

    /// Put captured surfaces back, matched by board index.
    pub fn restore(&mut self, surfaces: &[FrameBuffer]) {
        for (board, saved) in self.boards.iter_mut().zip(surfaces) {
            board.surface.copy_from(saved);
        }
    }
}
