// Software brush: the one drawing primitive the boards need.
// A segment of width `w` with round cap and round join is the set of pixels
// whose centre lies within w/2 of the segment. Consecutive segments that share
// an end point overlap in a full disc there, which gives the round join for free.

use crate::types::{FrameBuffer, Point};

/// Paint a thick, round-capped line from `a` to `b`.
/// `a == b` paints a filled disc (a dot).
pub fn stroke_segment(fb: &mut FrameBuffer, a: Point, b: Point, width: f32, color: u32) {
    let r = (width * 0.5).max(0.5);
    let r2 = r * r;

    // Scan just the bounding box of the capsule, clipped to the surface
    let min_x = (a.x.min(b.x) - r).floor().max(0.0) as i64;
    let min_y = (a.y.min(b.y) - r).floor().max(0.0) as i64;
    let max_x = ((a.x.max(b.x) + r).ceil() as i64).min(fb.width as i64 - 1);
    let max_y = ((a.y.max(b.y) + r).ceil() as i64).min(fb.height as i64 - 1);
    if max_x < min_x || max_y < min_y {
        return;
    }

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;

    for y in min_y..=max_y {
        let py = y as f32 + 0.5;
        let row = y as usize * fb.width;
        for x in min_x..=max_x {
            let px = x as f32 + 0.5;

            // Closest point on the segment to the pixel centre
            let t = if len2 > 0.0 {
                (((px - a.x) * dx + (py - a.y) * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let cx = a.x + dx * t - px;
            let cy = a.y + dy * t - py;
            if cx * cx + cy * cy <= r2 {
                fb.pixels[row + x as usize] = color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: u32 = 0x00_00_00_00;
    const INK: u32 = 0x00_ff_00_00;

    #[test]
    fn dot_covers_its_radius() {
        let mut fb = FrameBuffer::filled(20, 20, BG);
        let p = Point::new(10.0, 10.0);
        stroke_segment(&mut fb, p, p, 6.0, INK);
        assert_eq!(fb.pixel(10, 10), Some(INK));
        assert_eq!(fb.pixel(8, 10), Some(INK));
        assert_eq!(fb.pixel(15, 10), Some(BG));
        assert_eq!(fb.pixel(0, 0), Some(BG));
    }

    #[test]
    fn segment_covers_its_length() {
        let mut fb = FrameBuffer::filled(40, 40, BG);
        stroke_segment(&mut fb, Point::new(10.0, 10.0), Point::new(20.0, 20.0), 4.0, INK);
        for i in 10..20 {
            assert_eq!(fb.pixel(i, i), Some(INK), "diagonal pixel {i}");
        }
        assert_eq!(fb.pixel(30, 30), Some(BG));
        assert_eq!(fb.pixel(20, 10), Some(BG));
    }

    #[test]
    fn round_cap_extends_past_end_point() {
        let mut fb = FrameBuffer::filled(40, 20, BG);
        stroke_segment(&mut fb, Point::new(10.0, 10.0), Point::new(20.0, 10.0), 8.0, INK);
        // Cap reaches about r = 4 beyond the end
        assert_eq!(fb.pixel(22, 10), Some(INK));
        assert_eq!(fb.pixel(7, 10), Some(INK));
        // ...but is round, so the corner of the bounding box stays clear
        assert_eq!(fb.pixel(23, 6), Some(BG));
    }

    #[test]
    fn clipped_at_surface_edges() {
        let mut fb = FrameBuffer::filled(10, 10, BG);
        stroke_segment(&mut fb, Point::new(-5.0, 5.0), Point::new(50.0, 5.0), 2.0, INK);
        assert_eq!(fb.pixel(0, 5), Some(INK));
        assert_eq!(fb.pixel(9, 5), Some(INK));
        assert_eq!(fb.pixels.len(), 100);

        // Entirely off-surface draws nothing
        let before = fb.clone();
        stroke_segment(&mut fb, Point::new(-30.0, -30.0), Point::new(-20.0, -20.0), 4.0, INK);
        assert_eq!(fb, before);
    }
}
