// Core types shared by the boards, the history and the window.

use std::collections::TryReserveError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the surface is (pixels)
    pub height: usize,    // how tall the surface is (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A surface of the given size, every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Colour at (x, y), `None` outside the surface.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Paint every pixel. Visual: the surface becomes one flat colour.
    pub fn fill(&mut self, color: u32) {
        for p in &mut self.pixels {
            *p = color;
        }
    }

    /// Number of pixels the buffer should hold for its declared size.
    pub fn expected_len(&self) -> usize {
        self.width * self.height
    }

    /// Copy the surface without aborting the process when memory runs out.
    pub fn try_clone(&self) -> Result<Self, TryReserveError> {
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(self.pixels.len())?;
        pixels.extend_from_slice(&self.pixels);
        Ok(Self {
            width: self.width,
            height: self.height,
            pixels,
        })
    }

    /// Overwrite this surface with `other`. Sizes are fixed for a session;
    /// a mismatched copy only transfers the overlapping prefix.
    pub fn copy_from(&mut self, other: &FrameBuffer) {
        let n = self.pixels.len().min(other.pixels.len());
        self.pixels[..n].copy_from_slice(&other.pixels[..n]);
    }
}

/// Surface-local pointer position in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
