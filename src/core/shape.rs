//! Shape catalog - canonical cell offsets for the seven piece kinds
//!
//! Offsets are in spawn orientation, anchored so every cell is
//! non-negative. Rotation here works on offset lists (used by the
//! placement predictor); live pieces rotate around a pivot instead, see
//! `core::piece`.

use crate::types::{Coord, PieceKind, PIECE_CELLS};

/// Canonical cell offsets for a piece kind in spawn orientation.
pub fn cells(kind: PieceKind) -> [Coord; PIECE_CELLS] {
    match kind {
        PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        PieceKind::I => [(0, 0), (1, 0), (2, 0), (3, 0)],
        PieceKind::T => [(1, 0), (0, 1), (1, 1), (2, 1)],
        PieceKind::L => [(0, 0), (0, 1), (0, 2), (1, 2)],
        PieceKind::J => [(1, 0), (1, 1), (1, 2), (0, 2)],
        PieceKind::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
        PieceKind::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
    }
}

/// Rotate an offset shape by `quarter_turns` 90-degree counter-clockwise
/// steps, re-normalizing to non-negative offsets after each step.
pub fn rotated(shape: [Coord; PIECE_CELLS], quarter_turns: u8) -> [Coord; PIECE_CELLS] {
    let mut out = shape;
    for _ in 0..quarter_turns {
        for cell in out.iter_mut() {
            let (x, y) = *cell;
            *cell = (-y, x);
        }
        normalize(&mut out);
    }
    out
}

/// Shift offsets so the minimum x and y are both zero.
fn normalize(shape: &mut [Coord; PIECE_CELLS]) {
    let min_x = shape.iter().map(|&(x, _)| x).min().unwrap_or(0);
    let min_y = shape.iter().map(|&(_, y)| y).min().unwrap_or(0);
    for cell in shape.iter_mut() {
        cell.0 -= min_x;
        cell.1 -= min_y;
    }
}

/// Largest x offset in a shape.
pub fn max_x(shape: &[Coord]) -> i16 {
    shape.iter().map(|&(x, _)| x).max().unwrap_or(0)
}

/// Number of columns a shape spans.
pub fn width(shape: &[Coord]) -> i16 {
    let min = shape.iter().map(|&(x, _)| x).min().unwrap_or(0);
    max_x(shape) - min + 1
}
