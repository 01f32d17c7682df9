//! Piece queue - buffered lookahead of upcoming piece kinds
//!
//! The buffer holds `max_len` kinds drawn uniformly over the seven shapes.
//! Consumers pop from the front and refill back to `max_len`; `peek` is the
//! non-destructive view used for prediction and the next-piece panel.

use arrayvec::ArrayVec;

use crate::core::rng::SimpleRng;
use crate::types::{PieceKind, MAX_QUEUE_LOOKAHEAD};

/// Upcoming-piece buffer with uniform random refill.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    max_len: usize,
    rng: SimpleRng,
    buffer: ArrayVec<PieceKind, MAX_QUEUE_LOOKAHEAD>,
}

impl PieceQueue {
    /// Create a queue with `max_len` lookahead, filled from `rng`.
    /// Lookahead is clamped to the buffer capacity.
    pub fn new(max_len: usize, rng: SimpleRng) -> Self {
        let mut queue = Self {
            max_len: max_len.clamp(1, MAX_QUEUE_LOOKAHEAD),
            rng,
            buffer: ArrayVec::new(),
        };
        queue.refill();
        queue
    }

    /// Remove and return the front entry. The caller triggers the refill.
    pub fn pop(&mut self) -> Option<PieceKind> {
        self.buffer.pop_at(0)
    }

    /// Top the buffer back up to `max_len`, trimming from the front if it
    /// ever overshoots. The trim should not fire under normal use.
    pub fn refill(&mut self) {
        while self.buffer.len() < self.max_len {
            let kind = self.rng.pick_kind();
            self.buffer.push(kind);
        }
        while self.buffer.len() > self.max_len {
            let _ = self.buffer.pop_at(0);
        }
    }

    /// First `n` entries without mutation, clamped to the current length.
    pub fn peek(&self, n: usize) -> &[PieceKind] {
        &self.buffer[..n.min(self.buffer.len())]
    }

    /// Pop the front entry and immediately refill.
    pub fn draw(&mut self) -> PieceKind {
        let kind = match self.pop() {
            Some(kind) => kind,
            None => self.rng.pick_kind(),
        };
        self.refill();
        kind
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}
