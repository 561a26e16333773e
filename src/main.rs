// What you SEE:
// • N panels side by side, each in its own pop-art background colour.
// • Hold Left Mouse on any panel and draw: every panel gets the same line,
//   each in its own ink.
// • D / L switch dark and light ink, 1-4 pick the brush size.
// • U (or Backspace) undoes the last stroke, C clears everything.
// • Leave it alone for a minute and it asks if you are still there; ignore that
//   too and the panels are wiped for the next person. ESC quits.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use warhol_boards::config::{Cli, Config};
use warhol_boards::draw::{compose, draw_crosshair, Drawer};
use warhol_boards::input::{command_for_key, PointerTracker};
use warhol_boards::layout::Layout;
use warhol_boards::logging;
use warhol_boards::session::{Command, Session};
use warhol_boards::types::FrameBuffer;

fn main() -> Result<()> {
    /* --- Config + logging --- */
    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    logging::init(&config.logging.level)?;

    /* --- Boards + history baseline --- */
    let palette = config.palette()?;
    let layout = Layout::new(
        palette.len(),
        config.canvas.columns,
        config.canvas.board_width,
        config.canvas.board_height,
        config.canvas.gap,
    );
    let mut session = Session::new(palette, &config.session_settings()?)?;
    // Welcome prompt first; the idle timer only starts once it is dismissed.
    session.handle_command(Command::ShowHelp)?;

    /* --- Window + reusable screen buffer --- */
    let (width, height) = layout.window_size();
    let mut drawer = Drawer::new("Pop Art Boards", width, height)?;
    let mut screen = FrameBuffer::filled(width, height, 0);
    let mut pointer = PointerTracker::default();
    info!(boards = session.boards().len(), width, height, "ready");

    /* ------------------------------ Main loop ------------------------------ */
    // One event at a time, each handled to completion: keys, then the pointer,
    // then the idle clock, then the picture.
    let mut last_frame = Instant::now();
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let dt = now - last_frame;
        last_frame = now;

        // 1) Toolbar keys
        for key in drawer.keys_pressed() {
            if let Some(command) = command_for_key(key, &config.brush.sizes) {
                if let Err(err) = session.handle_command(command) {
                    warn!(%err, ?command, "command failed");
                }
            }
        }

        // 2) Pointer: same board-local position on every panel
        let mouse = drawer.mouse_pos();
        let hit = mouse.and_then(|(x, y)| layout.hit(x, y));
        if let Some(event) = pointer.update(drawer.left_mouse_down(), hit) {
            if let Err(err) = session.handle_input(event) {
                warn!(%err, ?event, "input failed");
            }
        }

        // 3) Idle clock
        if let Err(err) = session.advance(dt) {
            warn!(%err, "idle reset failed");
        }

        // 4) Picture
        compose(&mut screen, &session, &layout);
        if let (Some((mx, my)), Some(_)) = (mouse, hit) {
            draw_crosshair(&mut screen, mx as i32, my as i32, 8, 0x00_FF_CC_33);
        }
        drawer.present(&screen)?;
    }

    info!("bye");
    Ok(())
}
