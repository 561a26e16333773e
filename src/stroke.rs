// Stroke recording.
// Only the live end of the open stroke is kept: the surfaces already hold
// everything drawn so far, and the history holds full copies of them.

use crate::error::{Error, Result};
use crate::palette::Shade;
use crate::types::Point;

/// Brush settings chosen on the toolbar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawState {
    pub shade: Shade,
    pub width: u32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self { shade: Shade::Dark, width: 20 }
    }
}

/// One recorded pointer sample plus the brush active when it was taken.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub point: Point,
    pub dragging: bool,
    pub shade: Shade,
    pub width: u32,
}

/// What the renderer has to draw for one `extend`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub shade: Shade,
    pub width: u32,
}

/// Returned when a stroke is sealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrokeSummary {
    /// Number of samples appended after the seed.
    pub drags: usize,
}

impl StrokeSummary {
    /// A press/release with no movement in between.
    pub fn is_click(&self) -> bool {
        self.drags == 0
    }
}

#[derive(Debug)]
struct OpenStroke {
    seed: Sample,
    last: Sample,
    drags: usize,
}

#[derive(Debug, Default)]
pub struct StrokeRecorder {
    state: DrawState,
    open: Option<OpenStroke>,
}

impl StrokeRecorder {
    pub fn new(state: DrawState) -> Self {
        Self { state, open: None }
    }

    pub fn draw_state(&self) -> DrawState {
        self.state
    }

    pub fn set_shade(&mut self, shade: Shade) {
        self.state.shade = shade;
    }

    /// Widths below one pixel are raised to one.
    pub fn set_width(&mut self, width: u32) {
        self.state.width = width.max(1);
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The first sample of the open stroke.
    pub fn seed(&self) -> Option<Sample> {
        self.open.as_ref().map(|s| s.seed)
    }

    /// The most recent sample of the open stroke.
    pub fn last(&self) -> Option<Sample> {
        self.open.as_ref().map(|s| s.last)
    }

    fn sample(&self, point: Point, dragging: bool) -> Sample {
        Sample {
            point,
            dragging,
            shade: self.state.shade,
            width: self.state.width,
        }
    }

    pub fn begin(&mut self, point: Point) -> Result<()> {
        if self.open.is_some() {
            return Err(Error::InvalidStrokeState("begin while a stroke is open"));
        }
        let seed = self.sample(point, false);
        self.open = Some(OpenStroke { seed, last: seed, drags: 0 });
        Ok(())
    }

    /// Append a dragging sample and hand back the segment joining it to the
    /// previous one. Shade and width are read now, not at `begin`.
    pub fn extend(&mut self, point: Point) -> Result<Segment> {
        let sample = self.sample(point, true);
        let open = self
            .open
            .as_mut()
            .ok_or(Error::InvalidStrokeState("extend without an open stroke"))?;
        let segment = Segment {
            from: open.last.point,
            to: point,
            shade: sample.shade,
            width: sample.width,
        };
        open.last = sample;
        open.drags += 1;
        Ok(segment)
    }

    pub fn end(&mut self) -> Result<StrokeSummary> {
        let open = self
            .open
            .take()
            .ok_or(Error::InvalidStrokeState("end without an open stroke"))?;
        Ok(StrokeSummary { drags: open.drags })
    }

    /// Drop the open stroke, if any, without reporting it.
    pub fn cancel(&mut self) {
        self.open = None;
    }
}
