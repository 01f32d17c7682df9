//! World module - the shared simulation state
//!
//! The world owns the board, every piece spawned this round, the upcoming
//! queue and the score. Components borrow it mutably one at a time in tick
//! order, so nothing ever aliases the grid.

use crate::core::board::Board;
use crate::core::piece::Tetromino;
use crate::core::queue::PieceQueue;
use crate::core::score::ScoreState;

/// Every piece spawned this round, in spawn order.
///
/// At most one piece is ever unlanded; the rest sit on the stack until row
/// clears consume them.
#[derive(Debug, Default)]
pub struct PieceStore {
    items: Vec<Tetromino>,
}

impl PieceStore {
    pub fn push(&mut self, piece: Tetromino) {
        self.items.push(piece);
    }

    /// The falling piece, if one exists.
    pub fn active(&self) -> Option<&Tetromino> {
        self.items.iter().find(|piece| !piece.landed())
    }

    pub fn active_mut(&mut self) -> Option<&mut Tetromino> {
        self.items.iter_mut().find(|piece| !piece.landed())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tetromino> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tetromino> {
        self.items.iter_mut()
    }

    /// Drop pieces whose cells were fully consumed by row clears.
    pub fn sweep_consumed(&mut self) {
        self.items.retain(|piece| !piece.is_consumed());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Mutable simulation state shared by all components.
#[derive(Debug)]
pub struct World {
    pub board: Board,
    pub pieces: PieceStore,
    pub queue: PieceQueue,
    pub score: ScoreState,
    /// Rows cleared by the latest line-clear pass, consumed by the
    /// scoreboard on its next update.
    pub cleared_rows: u32,
}

impl World {
    pub fn new(board: Board, queue: PieceQueue) -> Self {
        Self {
            board,
            pieces: PieceStore::default(),
            queue,
            score: ScoreState::default(),
            cleared_rows: 0,
        }
    }

    /// Gravity step for the active piece, if any.
    pub fn apply_gravity(&mut self, now_ms: u64) {
        let Self { board, pieces, .. } = self;
        if let Some(piece) = pieces.active_mut() {
            piece.apply_gravity(board, now_ms);
        }
    }
}
