// Window + software drawing for the presentation side.
// What ends up on screen each frame:
// 1) Every board surface copied into its tile.
// 2) A status strip with the brush, history depth and undo state.
// 3) Prompt boxes over dimmed boards while a prompt is open.
// 4) A crosshair at the pointer.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::layout::Layout;
use crate::session::Session;
use crate::types::FrameBuffer;

const FRAME_COLOR: u32 = 0x00_1a_1a_1a;
const TEXT_COLOR: u32 = 0x00_ff_ff_ff;
const MUTED_COLOR: u32 = 0x00_88_88_88;
const NOTICE_COLOR: u32 = 0x00_ff_60_40;
const PROMPT_BG: u32 = 0x00_10_10_10;
const PROMPT_BORDER: u32 = 0x00_fe_fa_08;

pub struct Drawer {
    window: Window,
}

impl Drawer {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Pointer position in window pixels, `None` when outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Keys that went down since the last frame.
    pub fn keys_pressed(&self) -> Vec<Key> {
        self.window.get_keys_pressed(KeyRepeat::No)
    }
}

/* ---------- Frame composition ---------- */

/// Paint the whole window for the current session state.
pub fn compose(screen: &mut FrameBuffer, session: &Session, layout: &Layout) {
    screen.fill(FRAME_COLOR);

    for board in session.boards().iter() {
        let (ox, oy) = layout.origin(board.index());
        blit(screen, &board.surface, ox, oy);
    }

    draw_status(screen, session, layout);

    let prompts = session.prompts();
    if prompts.any() {
        dim(screen);
        if prompts.welcome {
            draw_prompt(screen, &WELCOME_LINES);
        } else {
            draw_prompt(screen, &INACTIVITY_LINES);
        }
    }
}

const WELCOME_LINES: [&str; 6] = [
    "POP ART BOARDS",
    "DRAW ON ANY PANEL, EVERY PANEL FOLLOWS",
    "D/L: SHADE   1-4: BRUSH SIZE",
    "U: UNDO   C: CLEAR   H: HELP",
    "",
    "PRESS ENTER TO START",
];

const INACTIVITY_LINES: [&str; 5] = [
    "STILL THERE?",
    "",
    "ENTER OR DRAW: KEEP GOING",
    "R: START OVER",
    "(THE BOARDS WILL CLEAR SOON)",
];

fn draw_status(screen: &mut FrameBuffer, session: &Session, layout: &Layout) {
    let top = layout.status_top() as i32 + 3;
    let state = session.draw_state();
    let history = session.history();
    let status = format!(
        "{} | SIZE {} | STATES {}/{} | UNDO {}",
        state.shade.name(),
        state.width,
        history.len(),
        history.max_states(),
        if session.can_undo() { "ON" } else { "OFF" },
    );
    draw_text_5x7(screen, 6, top, &status, TEXT_COLOR, 1);

    let hint_x = 6 + text_width(&status, 1) + 12;
    match session.notice() {
        Some(notice) => draw_text_5x7(screen, hint_x, top, notice, NOTICE_COLOR, 1),
        None => draw_text_5x7(screen, hint_x, top, "H: HELP  ESC: QUIT", MUTED_COLOR, 1),
    }
}

/// Centered box with one line of text per entry, drawn at double size.
fn draw_prompt(screen: &mut FrameBuffer, lines: &[&str]) {
    let scale = 2;
    let line_h = 9 * scale;
    let pad = 12;
    let inner_w = lines.iter().map(|l| text_width(l, scale)).max().unwrap_or(0);
    let w = inner_w + 2 * pad;
    let h = lines.len() as i32 * line_h + 2 * pad;
    let x = (screen.width as i32 - w) / 2;
    let y = (screen.height as i32 - h) / 2;

    fill_rect(screen, x, y, w, h, PROMPT_BG);
    outline_rect(screen, x, y, w, h, PROMPT_BORDER);
    for (i, line) in lines.iter().enumerate() {
        let lx = x + (w - text_width(line, scale)) / 2;
        draw_text_5x7(screen, lx, y + pad + i as i32 * line_h, line, TEXT_COLOR, scale);
    }
}

/// Copy `src` into `dst` with its top-left corner at (ox, oy), clipped.
/// Visual: one board tile appears in its slot of the grid.
fn blit(dst: &mut FrameBuffer, src: &FrameBuffer, ox: usize, oy: usize) {
    if ox >= dst.width || oy >= dst.height {
        return;
    }
    let w = src.width.min(dst.width - ox);
    for y in 0..src.height.min(dst.height - oy) {
        let s = y * src.width;
        let d = (oy + y) * dst.width + ox;
        dst.pixels[d..d + w].copy_from_slice(&src.pixels[s..s + w]);
    }
}

/// Halve every channel (cheap "modal backdrop").
/// Visual: the boards fade to half brightness behind a prompt.
fn dim(fb: &mut FrameBuffer) {
    for p in &mut fb.pixels {
        *p = (*p >> 1) & 0x00_7f_7f_7f;
    }
}

/* ---------- Software drawing: pixels, rectangles, crosshair, tiny bitmap font ---------- */

/// Write one pixel, ignoring anything off-screen.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Solid rectangle. Visual: the dark box behind prompt text.
fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for yy in y..y + h {
        for xx in x..x + w {
            put_pixel(fb, xx, yy, color);
        }
    }
}

fn outline_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    draw_line(fb, x, y, x + w - 1, y, color);
    draw_line(fb, x, y + h - 1, x + w - 1, y + h - 1, color);
    draw_line(fb, x, y, x, y + h - 1, color);
    draw_line(fb, x + w - 1, y, x + w - 1, y + h - 1, color);
}

/// Thin line between (x0,y0) and (x1,y1) using Bresenham.
/// Visual: a crisp 1-pixel line, no anti-aliasing.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Small "+" at the pointer, with a gap in the middle so the brush spot stays visible.
/// Visual: a yellow target that follows the mouse over the boards.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (upper case, digits, a little punctuation) ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),

        _ => None,
    }
}

/// Pixel width of `text` at `scale` (6 px advance per glyph).
fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 6 * scale
}

/// One glyph at (x,y) with a 1-pixel (scaled) black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    let Some(rows) = glyph5x7(ch) else {
        return;
    };
    for (offset, c) in [(scale, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let px = x + rx * scale + offset;
                    let py = y + ry as i32 * scale + offset;
                    fill_rect(fb, px, py, scale, scale, c);
                }
            }
        }
    }
}

/// Left-to-right text; unknown characters advance without drawing.
/// Visual: the status line and prompt captions.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale;
    }
}
