//! Spawner - turns the queue into live pieces and feeds the predictor
//!
//! Runs once per tick before the line clearer. While a piece is falling it
//! does nothing. When the active piece lands (or none exists yet) it first
//! records the finished placement, then draws the next kind, spawns it at
//! the top and attaches a fresh suggestion. Prediction runs against the
//! stack before the new piece occupies the board, and a predictor failure
//! only costs the suggestion, never the spawn.

use std::any::Any;

use crate::core::board::Board;
use crate::core::piece::Tetromino;
use crate::core::predict::Predictor;
use crate::core::rng::SimpleRng;
use crate::core::shape;
use crate::corpus::{current_timestamp_ms, PlacementRecord, RecordReason};
use crate::engine::registry::{Component, Updatable};
use crate::engine::world::World;
use crate::types::{Coord, PieceKind};

pub struct Spawner {
    gravity_ms: u64,
    spawn_override: Option<Coord>,
    rng: SimpleRng,
    predictor: Predictor,
}

impl Spawner {
    pub fn new(
        gravity_ms: u64,
        spawn_override: Option<Coord>,
        rng: SimpleRng,
        predictor: Predictor,
    ) -> Self {
        Self {
            gravity_ms,
            spawn_override,
            rng,
            predictor,
        }
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    /// Spawn column and row for `kind`: the override when configured,
    /// otherwise a random column. Either way the column is clamped so the
    /// piece's right edge stays on the board.
    fn spawn_origin(&mut self, board: &Board, kind: PieceKind) -> Coord {
        let max_column = (board.columns() - 1 - shape::max_x(&shape::cells(kind))).max(0);
        let (column, y) = match self.spawn_override {
            Some((x, y)) => (x, y),
            None => {
                let column = self.rng.next_range(board.columns() as u32 + 1) as i16;
                (column, 0)
            }
        };
        (column.clamp(0, max_column), y)
    }
}

impl Component for Spawner {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Updatable for Spawner {
    fn update(&mut self, world: &mut World, now_ms: u64) {
        if world.pieces.active().is_some() {
            return;
        }
        let World {
            board,
            pieces,
            queue,
            ..
        } = world;

        // Record the placement that just finished. The line clearer runs
        // after the spawner, so the rows this piece completed are still on
        // the board and the queue still holds the kind about to spawn.
        if let Some(last) = pieces.iter().last() {
            let record = PlacementRecord {
                piece: last.kind(),
                landed_coordinates: last.cells().to_vec(),
                rotation: last.rotation_index(),
                lines_cleared: board.full_row_count(),
                next_pieces_queue: queue.peek(1).to_vec(),
                timestamp: current_timestamp_ms(),
                reason: RecordReason::Auto,
            };
            self.predictor.write_pattern(record);
        }

        let kind = queue.draw();
        let origin = self.spawn_origin(board, kind);
        let mut piece = Tetromino::new(kind, origin, now_ms, self.gravity_ms);
        // Prediction sees the stack without the fresh piece. A failure
        // spawns the piece with no suggestion.
        let suggestion = self.predictor.predict(board, kind).ok();
        piece.set_suggestion(suggestion);
        board.occupy(piece.cells(), kind);
        pieces.push(piece);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::queue::PieceQueue;
    use crate::corpus::CorpusStore;

    fn test_world() -> World {
        World::new(Board::new(10, 20), PieceQueue::new(3, SimpleRng::new(5)))
    }

    fn test_spawner(spawn_override: Option<Coord>) -> Spawner {
        Spawner::new(
            500,
            spawn_override,
            SimpleRng::new(9),
            Predictor::new(CorpusStore::Memory),
        )
    }

    #[test]
    fn test_first_update_spawns_without_recording() {
        let mut world = test_world();
        let mut spawner = test_spawner(Some((3, 0)));

        spawner.update(&mut world, 0);

        assert_eq!(world.pieces.len(), 1);
        assert!(spawner.predictor().records().is_empty());
        let active = world.pieces.active().map(|p| p.cells().to_vec());
        assert!(active.is_some());
        // The fresh piece sits on the board.
        for &(x, y) in world.pieces.active().map(|p| p.cells()).unwrap_or(&[]) {
            assert!(world.board.is_occupied(x, y));
        }
    }

    #[test]
    fn test_update_is_idle_while_a_piece_falls() {
        let mut world = test_world();
        let mut spawner = test_spawner(Some((3, 0)));

        spawner.update(&mut world, 0);
        spawner.update(&mut world, 16);
        spawner.update(&mut world, 32);

        assert_eq!(world.pieces.len(), 1);
    }

    #[test]
    fn test_landing_records_then_respawns() {
        let mut world = test_world();
        let mut spawner = test_spawner(Some((0, 0)));

        spawner.update(&mut world, 0);
        let first_kind = world.pieces.active().map(Tetromino::kind);
        {
            let World { board, pieces, .. } = &mut world;
            if let Some(piece) = pieces.active_mut() {
                piece.hard_drop(board);
            }
        }

        spawner.update(&mut world, 16);

        assert_eq!(world.pieces.len(), 2);
        let records = spawner.predictor().records();
        assert_eq!(records.len(), 1);
        assert_eq!(Some(records[0].piece), first_kind);
        assert_eq!(records[0].reason, RecordReason::Auto);
        assert_eq!(records[0].lines_cleared, 0);
        assert_eq!(records[0].rotation, 0);
        assert_eq!(records[0].next_pieces_queue.len(), 1);
        assert!(!records[0].landed_coordinates.is_empty());
    }

    #[test]
    fn test_recorded_lines_cleared_scans_the_board() {
        let mut world = test_world();
        let mut spawner = test_spawner(Some((0, 0)));
        // Pre-fill row 19 except the two leftmost columns, then land a
        // piece that completes the row.
        let filler: Vec<Coord> = (2..10).map(|x| (x, 19)).collect();
        world.board.occupy(&filler, PieceKind::O);

        spawner.update(&mut world, 0);
        {
            let World { board, pieces, .. } = &mut world;
            if let Some(piece) = pieces.active_mut() {
                piece.hard_drop(board);
            }
        }
        spawner.update(&mut world, 16);

        let records = spawner.predictor().records();
        assert_eq!(records.len(), 1);
        // Whether the landed piece completed row 19 depends on its kind;
        // the count must match the board scan either way.
        assert_eq!(records[0].lines_cleared, world.board.full_row_count());
    }

    #[test]
    fn test_spawned_piece_carries_a_suggestion() {
        let mut world = test_world();
        let mut spawner = test_spawner(Some((3, 0)));

        spawner.update(&mut world, 0);

        let suggestion = world.pieces.active().and_then(|p| p.suggestion().copied());
        assert!(suggestion.is_some());
    }

    #[test]
    fn test_spawn_override_pins_the_column() {
        let mut world = test_world();
        let mut spawner = test_spawner(Some((4, 2)));

        spawner.update(&mut world, 0);

        let (min_x, _, min_y, _) = world.pieces.active().map(|p| p.bounds()).unwrap_or_default();
        assert_eq!(min_x, 4);
        assert_eq!(min_y, 2);
    }

    #[test]
    fn test_random_spawn_stays_on_the_board() {
        for seed in 0..40 {
            let mut world = test_world();
            let mut spawner = Spawner::new(
                500,
                None,
                SimpleRng::new(seed),
                Predictor::new(CorpusStore::Memory),
            );
            spawner.update(&mut world, 0);

            let (min_x, max_x, min_y, _) =
                world.pieces.active().map(|p| p.bounds()).unwrap_or_default();
            assert!(min_x >= 0);
            assert!(max_x < 10);
            assert_eq!(min_y, 0);
        }
    }

    #[test]
    fn test_spawn_override_clamps_wide_pieces() {
        let mut world = test_world();
        // Column 9 cannot host most shapes; the spawner clamps it.
        let mut spawner = test_spawner(Some((9, 0)));

        spawner.update(&mut world, 0);

        let (_, max_x, _, _) = world.pieces.active().map(|p| p.bounds()).unwrap_or_default();
        assert!(max_x < 10);
    }
}
