//! Line clearer - resolves completed rows across all landed pieces
//!
//! A row qualifies when every column is covered by landed cells; the
//! active piece never counts toward a row and never moves with one. All
//! qualifying rows resolve in a single pass so multi-line clears reach the
//! scoreboard as one count: remove the rows from every landed piece, shift
//! every landed piece down, then re-occupy the board from the surviving
//! coordinates.

use std::any::Any;

use crate::engine::registry::{Component, Updatable};
use crate::engine::world::World;

#[derive(Default)]
pub struct LineClearer;

impl LineClearer {
    pub fn new() -> Self {
        Self
    }
}

impl Component for LineClearer {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Updatable for LineClearer {
    fn update(&mut self, world: &mut World, _now_ms: u64) {
        let World {
            board,
            pieces,
            cleared_rows,
            ..
        } = world;

        let mut counts = vec![0u32; board.rows() as usize];
        for piece in pieces.iter() {
            if !piece.landed() {
                continue;
            }
            for &(_, y) in piece.cells() {
                if y >= 0 && y < board.rows() {
                    counts[y as usize] += 1;
                }
            }
        }

        let full: Vec<i16> = counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count >= board.columns() as u32)
            .map(|(y, _)| y as i16)
            .collect();
        if full.is_empty() {
            return;
        }

        for piece in pieces.iter_mut() {
            if piece.landed() {
                piece.remove_rows(board, &full);
            }
        }
        for piece in pieces.iter_mut() {
            if piece.landed() {
                piece.shift_down(board, &full);
            }
        }
        for piece in pieces.iter_mut() {
            if piece.landed() && !piece.is_consumed() {
                board.occupy(piece.cells(), piece.kind());
            }
        }
        pieces.sweep_consumed();

        *cleared_rows = full.len() as u32;
    }
}
