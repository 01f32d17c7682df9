//! GameView - draws the world into a framebuffer
//!
//! Pure layout code with no terminal I/O, so it is unit-testable. Each
//! board cell spans two terminal columns to compensate for the usual
//! glyph aspect ratio. The predictor's suggestion shows up as a dim
//! ghost at its resting position.

use std::any::Any;

use crate::core::piece::Tetromino;
use crate::core::predict;
use crate::engine::registry::{Component, Renderable};
use crate::engine::world::World;
use crate::term::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::PieceKind;

/// Terminal columns per board cell.
const CELL_W: u16 = 2;

#[derive(Debug, Default)]
pub struct GameView;

impl GameView {
    pub fn new() -> Self {
        Self
    }
}

impl Component for GameView {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Renderable for GameView {
    fn render(&self, world: &World, fb: &mut FrameBuffer) {
        fb.clear(Cell::default());

        let columns = world.board.columns() as u16;
        let rows = world.board.rows() as u16;
        let frame_w = columns * CELL_W + 2;
        let frame_h = rows + 2;
        let start_x = fb.width().saturating_sub(frame_w) / 2;
        let start_y = fb.height().saturating_sub(frame_h) / 2;

        draw_border(fb, start_x, start_y, frame_w, frame_h);

        let active = world.pieces.active();
        for y in 0..world.board.rows() {
            for x in 0..world.board.columns() {
                match world.board.get(x, y) {
                    Some(kind) => {
                        let held = active.map(|p| p.occupies(x, y)).unwrap_or(false);
                        let style = CellStyle {
                            bold: held,
                            ..piece_style(kind)
                        };
                        put_board_cell(fb, start_x, start_y, x as u16, y as u16, '█', style);
                    }
                    None => {
                        let style = CellStyle {
                            fg: Rgb::new(90, 90, 100),
                            bg: BACKDROP,
                            bold: false,
                            dim: true,
                        };
                        put_board_cell(fb, start_x, start_y, x as u16, y as u16, '·', style);
                    }
                }
            }
        }

        if let Some(piece) = active {
            draw_ghost(fb, world, piece, start_x, start_y);
        }

        draw_side_panel(fb, world, start_x + frame_w + 2, start_y);
    }
}

const BACKDROP: Rgb = Rgb::new(30, 30, 40);

fn piece_style(kind: PieceKind) -> CellStyle {
    let fg = match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    };
    CellStyle {
        fg,
        bg: BACKDROP,
        bold: false,
        dim: false,
    }
}

/// Dim outline of where the attached suggestion would come to rest.
/// The falling piece itself is lifted off the probe board first so it
/// cannot block its own target.
fn draw_ghost(fb: &mut FrameBuffer, world: &World, piece: &Tetromino, start_x: u16, start_y: u16) {
    let suggestion = match piece.suggestion() {
        Some(s) => *s,
        None => return,
    };
    let mut stack = world.board.clone();
    stack.vacate(piece.cells());
    let rest = match predict::resting_cells(&stack, piece.kind(), &suggestion) {
        Some(rest) => rest,
        None => return,
    };

    let style = CellStyle {
        fg: Rgb::new(140, 140, 140),
        bg: BACKDROP,
        bold: false,
        dim: true,
    };
    for &(x, y) in rest.iter() {
        if world.board.get(x, y).is_none() {
            put_board_cell(fb, start_x, start_y, x as u16, y as u16, '░', style);
        }
    }
}

fn put_board_cell(
    fb: &mut FrameBuffer,
    start_x: u16,
    start_y: u16,
    cell_x: u16,
    cell_y: u16,
    ch: char,
    style: CellStyle,
) {
    let px = start_x + 1 + cell_x * CELL_W;
    let py = start_y + 1 + cell_y;
    for dx in 0..CELL_W {
        fb.put_char(px + dx, py, ch, style);
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    if w < 2 || h < 2 {
        return;
    }
    let style = CellStyle {
        fg: Rgb::new(200, 200, 200),
        ..CellStyle::default()
    };

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_side_panel(fb: &mut FrameBuffer, world: &World, panel_x: u16, start_y: u16) {
    if panel_x >= fb.width() || fb.width() - panel_x < 8 {
        return;
    }

    let label = CellStyle {
        bold: true,
        ..CellStyle::default()
    };
    let value = CellStyle {
        fg: Rgb::new(200, 200, 200),
        ..CellStyle::default()
    };

    let mut y = start_y;
    for (name, amount) in [
        ("SCORE", world.score.score),
        ("LEVEL", world.score.level),
        ("LINES", world.score.total_lines),
        ("COMBO", world.score.combo),
    ] {
        fb.put_str(panel_x, y, name, label);
        fb.put_str(panel_x, y + 1, &format!("{}", amount), value);
        y = y.saturating_add(3);
    }

    fb.put_str(panel_x, y, "NEXT", label);
    y = y.saturating_add(1);
    for kind in world.queue.peek(world.queue.max_len()) {
        if y >= fb.height() {
            break;
        }
        fb.put_str(panel_x, y, kind.as_str(), piece_style(*kind));
        y = y.saturating_add(1);
    }

    if let Some(suggestion) = world.pieces.active().and_then(|piece| piece.suggestion()) {
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, "HINT", label);
        fb.put_str(panel_x, y + 1, suggestion.reason.as_str(), value);
    }
}
