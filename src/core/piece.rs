//! Tetromino module - a live piece and its collision rules
//!
//! A piece owns only its coordinate list; occupancy lives on the board and
//! every mutation keeps the two in sync. Landing detection is a side effect
//! of the downward collision probe: a downward step that fails on the floor
//! or on another piece's cell marks the piece landed. Sideways and rotation
//! probes are pure. Once landed a piece only moves through row clears.

use arrayvec::ArrayVec;

use crate::core::board::Board;
use crate::core::predict::Suggestion;
use crate::core::shape;
use crate::types::{Coord, PieceKind, PIECE_CELLS};

/// One falling or landed piece.
#[derive(Debug, Clone)]
pub struct Tetromino {
    kind: PieceKind,
    cells: ArrayVec<Coord, PIECE_CELLS>,
    landed: bool,
    last_step_ms: u64,
    gravity_ms: u64,
    rotation_index: u8,
    suggestion: Option<Suggestion>,
}

/// Round-half-away-from-zero midpoint of a bounding-box extent sum.
///
/// Pivot x is `midpoint(min_x + max_x)`, so a 3-wide piece pivots on its
/// middle column while a 4-wide piece pivots right of center. The rounding
/// rule is observable at piece edges and is fixed here on purpose.
fn midpoint(sum: i16) -> i16 {
    if sum >= 0 {
        (sum + 1) / 2
    } else {
        -((-sum + 1) / 2)
    }
}

impl Tetromino {
    /// Create a piece of `kind` with its canonical shape offset to `origin`.
    /// The gravity timer starts at `now_ms` so the first step happens one
    /// full interval after spawn.
    pub fn new(kind: PieceKind, origin: Coord, now_ms: u64, gravity_ms: u64) -> Self {
        let (ox, oy) = origin;
        let cells = shape::cells(kind)
            .iter()
            .map(|&(dx, dy)| (ox + dx, oy + dy))
            .collect();
        Self {
            kind,
            cells,
            landed: false,
            last_step_ms: now_ms,
            gravity_ms,
            rotation_index: 0,
            suggestion: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_cells(kind: PieceKind, cells: &[Coord], landed: bool) -> Self {
        Self {
            kind,
            cells: cells.iter().copied().collect(),
            landed,
            last_step_ms: 0,
            gravity_ms: crate::types::DEFAULT_GRAVITY_MS,
            rotation_index: 0,
            suggestion: None,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn landed(&self) -> bool {
        self.landed
    }

    /// A piece whose coordinates were fully consumed by row clears.
    pub fn is_consumed(&self) -> bool {
        self.cells.is_empty()
    }

    /// Quarter turns applied so far, mod 4. Recorded with placements;
    /// has no effect on physics.
    pub fn rotation_index(&self) -> u8 {
        self.rotation_index
    }

    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    pub fn set_suggestion(&mut self, suggestion: Option<Suggestion>) {
        self.suggestion = suggestion;
    }

    /// Whether (x, y) is one of this piece's own cells.
    pub fn occupies(&self, x: i16, y: i16) -> bool {
        self.cells.iter().any(|&(cx, cy)| cx == x && cy == y)
    }

    /// Collision probe for `coords` translated by (dx, dy).
    ///
    /// Returns true on any out-of-bounds target or a cell held by a
    /// different piece. A failing probe with dy > 0 marks this piece
    /// landed when the cause is the floor or another piece; x-bounds and
    /// above-top failures never land, and probes with dy <= 0 are pure.
    pub fn check_collision(&mut self, board: &Board, coords: &[Coord], dx: i16, dy: i16) -> bool {
        for &(x, y) in coords {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || nx >= board.columns() || ny < 0 {
                return true;
            }
            if ny >= board.rows() {
                if dy > 0 {
                    self.landed = true;
                }
                return true;
            }
            if board.is_occupied(nx, ny) && !self.occupies(nx, ny) {
                if dy > 0 {
                    self.landed = true;
                }
                return true;
            }
        }
        false
    }

    /// Translate by (dx, dy), keeping the board in sync.
    /// Returns false when landed or when the probe rejects the move.
    pub fn shift(&mut self, board: &mut Board, dx: i16, dy: i16) -> bool {
        if self.landed {
            return false;
        }
        let current = self.cells.clone();
        if self.check_collision(board, &current, dx, dy) {
            return false;
        }
        board.vacate(&current);
        for cell in self.cells.iter_mut() {
            cell.0 += dx;
            cell.1 += dy;
        }
        board.occupy(&self.cells, self.kind);
        true
    }

    /// Rotate 90 degrees clockwise around the pivot: each cell maps to
    /// `(px + (y - py), py - (x - px))`. No-op when blocked.
    pub fn rotate_cw(&mut self, board: &mut Board) -> bool {
        let (px, py) = self.pivot();
        let candidate = self
            .cells
            .iter()
            .map(|&(x, y)| (px + (y - py), py - (x - px)))
            .collect();
        self.apply_rotation(board, candidate, 1)
    }

    /// Rotate 90 degrees counter-clockwise around the pivot: each cell
    /// maps to `(px - (y - py), py + (x - px))`. No-op when blocked.
    pub fn rotate_ccw(&mut self, board: &mut Board) -> bool {
        let (px, py) = self.pivot();
        let candidate = self
            .cells
            .iter()
            .map(|&(x, y)| (px - (y - py), py + (x - px)))
            .collect();
        self.apply_rotation(board, candidate, 3)
    }

    fn apply_rotation(
        &mut self,
        board: &mut Board,
        candidate: ArrayVec<Coord, PIECE_CELLS>,
        quarter_turns: u8,
    ) -> bool {
        if self.landed {
            return false;
        }
        if self.check_collision(board, &candidate, 0, 0) {
            return false;
        }
        board.vacate(&self.cells);
        self.cells = candidate;
        board.occupy(&self.cells, self.kind);
        self.rotation_index = (self.rotation_index + quarter_turns) % 4;
        true
    }

    /// Step down until blocked, then force the landed state.
    pub fn hard_drop(&mut self, board: &mut Board) {
        if self.landed {
            return;
        }
        while self.shift(board, 0, 1) {}
        self.landed = true;
    }

    /// Step down by one when the gravity interval has elapsed.
    /// Returns true when a step was taken.
    pub fn apply_gravity(&mut self, board: &mut Board, now_ms: u64) -> bool {
        if self.landed {
            return false;
        }
        if now_ms.saturating_sub(self.last_step_ms) < self.gravity_ms {
            return false;
        }
        self.last_step_ms = now_ms;
        self.shift(board, 0, 1)
    }

    /// Drop every coordinate whose row is in `rows` and clear those board
    /// rows globally. Row removal ignores which piece occupies a cell.
    pub fn remove_rows(&mut self, board: &mut Board, rows: &[i16]) {
        self.cells.retain(|cell| {
            let y = cell.1;
            !rows.contains(&y)
        });
        for &row in rows {
            board.clear_row(row);
        }
    }

    /// Shift surviving coordinates down by the number of removed rows at or
    /// below each one, using pre-removal row numbers. Old board cells are
    /// vacated here; the caller re-occupies once every piece has shifted.
    pub fn shift_down(&mut self, board: &mut Board, rows: &[i16]) {
        if rows.is_empty() || self.cells.is_empty() {
            return;
        }
        let shifts: ArrayVec<i16, PIECE_CELLS> = self
            .cells
            .iter()
            .map(|&(_, y)| rows.iter().filter(|&&row| row >= y).count() as i16)
            .collect();
        board.vacate(&self.cells);
        for (cell, shift) in self.cells.iter_mut().zip(shifts) {
            cell.1 += shift;
        }
    }

    /// Bounding box as (min_x, max_x, min_y, max_y). All zeros when the
    /// piece has been consumed.
    pub fn bounds(&self) -> (i16, i16, i16, i16) {
        let mut cells = self.cells.iter();
        let first = match cells.next() {
            Some(&(x, y)) => (x, x, y, y),
            None => return (0, 0, 0, 0),
        };
        cells.fold(first, |(min_x, max_x, min_y, max_y), &(x, y)| {
            (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
        })
    }

    pub fn width(&self) -> i16 {
        if self.cells.is_empty() {
            return 0;
        }
        let (min_x, max_x, _, _) = self.bounds();
        max_x - min_x + 1
    }

    pub fn height(&self) -> i16 {
        if self.cells.is_empty() {
            return 0;
        }
        let (_, _, min_y, max_y) = self.bounds();
        max_y - min_y + 1
    }

    /// Rotation center: the rounded midpoint of the bounding box.
    pub fn pivot(&self) -> Coord {
        let (min_x, max_x, min_y, max_y) = self.bounds();
        (midpoint(min_x + max_x), midpoint(min_y + max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn cell_set(piece: &Tetromino) -> HashSet<Coord> {
        piece.cells().iter().copied().collect()
    }

    fn spawn_on(board: &mut Board, kind: PieceKind, origin: Coord) -> Tetromino {
        let piece = Tetromino::new(kind, origin, 0, 500);
        board.occupy(piece.cells(), kind);
        piece
    }

    #[test]
    fn test_spawn_offsets_canonical_shape() {
        let piece = Tetromino::new(PieceKind::T, (3, 0), 0, 500);
        assert_eq!(
            cell_set(&piece),
            [(4, 0), (3, 1), (4, 1), (5, 1)].into_iter().collect()
        );
        assert!(!piece.landed());
        assert_eq!(piece.rotation_index(), 0);
    }

    #[test]
    fn test_midpoint_rounds_half_away_from_zero() {
        assert_eq!(midpoint(3), 2);
        assert_eq!(midpoint(4), 2);
        assert_eq!(midpoint(1), 1);
        assert_eq!(midpoint(0), 0);
        assert_eq!(midpoint(-3), -2);
    }

    #[test]
    fn test_floor_probe_lands_piece() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::I, (0, 19));
        let cells = piece.cells().to_vec();

        assert!(piece.check_collision(&board, &cells, 0, 1));
        assert!(piece.landed());
    }

    #[test]
    fn test_wall_probe_is_pure() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::I, (0, 5));

        assert!(!piece.shift(&mut board, -1, 0));
        assert!(!piece.landed(), "sideways block must not land the piece");
        assert_eq!(cell_set(&piece), [(0, 5), (1, 5), (2, 5), (3, 5)].into_iter().collect());
    }

    #[test]
    fn test_landing_on_another_piece() {
        let mut board = Board::new(10, 20);
        let other = Tetromino::with_cells(PieceKind::O, &[(3, 18), (4, 18), (3, 19), (4, 19)], true);
        board.occupy(other.cells(), other.kind());

        let mut piece = spawn_on(&mut board, PieceKind::I, (3, 17));
        assert!(!piece.shift(&mut board, 0, 1));
        assert!(piece.landed());
    }

    #[test]
    fn test_own_cells_do_not_collide() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::O, (4, 5));

        // A one-cell downward step overlaps the piece's own bottom row.
        assert!(piece.shift(&mut board, 0, 1));
        assert_eq!(cell_set(&piece), [(4, 6), (5, 6), (4, 7), (5, 7)].into_iter().collect());
    }

    #[test]
    fn test_shift_keeps_board_in_sync() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::O, (4, 5));

        assert!(piece.shift(&mut board, 1, 0));
        assert!(!board.is_occupied(4, 5));
        assert!(board.is_occupied(5, 5));
        assert!(board.is_occupied(6, 6));
    }

    #[test]
    fn test_landed_piece_ignores_movement() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::O, (4, 5));
        piece.hard_drop(&mut board);
        let frozen = cell_set(&piece);

        assert!(!piece.shift(&mut board, -1, 0));
        assert!(!piece.rotate_cw(&mut board));
        assert!(!piece.apply_gravity(&mut board, 10_000));
        assert_eq!(cell_set(&piece), frozen);
    }

    #[test]
    fn test_rotation_probe_is_pure_when_blocked() {
        let mut board = Board::new(10, 20);
        // Clockwise rotation of a spawned T lands on (4, 2); occupy it.
        board.occupy(&[(4, 2)], PieceKind::S);
        let mut piece = spawn_on(&mut board, PieceKind::T, (3, 0));

        assert!(!piece.rotate_cw(&mut board));
        assert!(!piece.landed());
        assert_eq!(piece.rotation_index(), 0);
        assert_eq!(cell_set(&piece), [(4, 0), (3, 1), (4, 1), (5, 1)].into_iter().collect());
    }

    #[test]
    fn test_t_rotation_round_trip_restores_cells() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::T, (3, 5));
        let original = cell_set(&piece);

        assert!(piece.rotate_cw(&mut board));
        assert_ne!(cell_set(&piece), original);
        assert!(piece.rotate_ccw(&mut board));
        assert_eq!(cell_set(&piece), original);
        assert_eq!(piece.rotation_index(), 0);
    }

    #[test]
    fn test_i_rotation_round_trip_drifts_by_pivot_rounding() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::I, (3, 5));

        assert!(piece.rotate_cw(&mut board));
        assert_eq!(cell_set(&piece), [(5, 4), (5, 5), (5, 6), (5, 7)].into_iter().collect());
        assert!(piece.rotate_ccw(&mut board));
        // Even-width pivots round away from zero, so the round trip
        // translates the I piece by (+1, +1) instead of restoring it.
        assert_eq!(cell_set(&piece), [(4, 6), (5, 6), (6, 6), (7, 6)].into_iter().collect());
    }

    #[test]
    fn test_rotation_above_top_is_rejected() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::I, (3, 0));

        assert!(!piece.rotate_cw(&mut board));
        assert!(!piece.landed());
        assert_eq!(cell_set(&piece), [(3, 0), (4, 0), (5, 0), (6, 0)].into_iter().collect());
    }

    #[test]
    fn test_hard_drop_lands_on_floor() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::I, (3, 0));
        piece.hard_drop(&mut board);

        assert!(piece.landed());
        assert_eq!(
            cell_set(&piece),
            [(3, 19), (4, 19), (5, 19), (6, 19)].into_iter().collect()
        );
        assert!(board.is_occupied(3, 19));
        assert!(!board.is_occupied(3, 0));
    }

    #[test]
    fn test_gravity_waits_for_interval() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::O, (4, 0));

        assert!(!piece.apply_gravity(&mut board, 499));
        assert_eq!(cell_set(&piece), [(4, 0), (5, 0), (4, 1), (5, 1)].into_iter().collect());

        assert!(piece.apply_gravity(&mut board, 500));
        assert_eq!(cell_set(&piece), [(4, 1), (5, 1), (4, 2), (5, 2)].into_iter().collect());

        // Timer restarts from the step that fired.
        assert!(!piece.apply_gravity(&mut board, 999));
        assert!(piece.apply_gravity(&mut board, 1000));
    }

    #[test]
    fn test_remove_rows_drops_cells_and_clears_board_rows() {
        let mut board = Board::new(4, 8);
        let mut piece = Tetromino::with_cells(PieceKind::L, &[(0, 5), (0, 6), (0, 7), (1, 7)], true);
        board.occupy(piece.cells(), piece.kind());
        board.occupy(&[(2, 7), (3, 7)], PieceKind::Z);

        piece.remove_rows(&mut board, &[7]);

        assert_eq!(cell_set(&piece), [(0, 5), (0, 6)].into_iter().collect());
        // The whole board row goes, other pieces' cells included.
        assert!((0..4).all(|x| !board.is_occupied(x, 7)));
    }

    #[test]
    fn test_shift_down_counts_removed_rows_at_or_below() {
        let mut board = Board::new(4, 8);
        let mut piece = Tetromino::with_cells(PieceKind::J, &[(1, 2), (1, 4), (1, 6)], true);
        board.occupy(piece.cells(), piece.kind());

        piece.shift_down(&mut board, &[3, 5]);

        // y=2 sits above both removed rows, y=4 above one, y=6 above none.
        assert_eq!(cell_set(&piece), [(1, 4), (1, 5), (1, 6)].into_iter().collect());
        assert!(!board.is_occupied(1, 2), "old cells are vacated");
    }

    #[test]
    fn test_consumed_piece_reports_empty_geometry() {
        let mut board = Board::new(4, 8);
        let mut piece = Tetromino::with_cells(PieceKind::I, &[(0, 7), (1, 7), (2, 7), (3, 7)], true);
        board.occupy(piece.cells(), piece.kind());

        piece.remove_rows(&mut board, &[7]);

        assert!(piece.is_consumed());
        assert_eq!(piece.width(), 0);
        assert_eq!(piece.height(), 0);
        assert_eq!(piece.bounds(), (0, 0, 0, 0));
    }

    #[test]
    fn test_bounds_width_height_agree_after_mutations() {
        let mut board = Board::new(10, 20);
        let mut piece = spawn_on(&mut board, PieceKind::S, (2, 3));

        for _ in 0..3 {
            piece.rotate_cw(&mut board);
            let (min_x, max_x, min_y, max_y) = piece.bounds();
            assert_eq!(piece.width(), max_x - min_x + 1);
            assert_eq!(piece.height(), max_y - min_y + 1);
            piece.shift(&mut board, 1, 1);
        }
    }
}
