//! Placement predictor - greedy line completion with an n-gram fallback
//!
//! Suggestions are advisory: the spawner attaches them to fresh pieces and
//! nothing ever auto-moves a piece. Phase one scans rotations (outer) and
//! columns (inner) for the first drop that completes a row. Phase two falls
//! back to the column most often played for the (previous kind, current
//! kind) pair in the corpus, defaulting to column 0.

use std::collections::HashMap;
use std::fmt;

use arrayvec::ArrayVec;

use crate::core::board::Board;
use crate::core::shape;
use crate::corpus::{CorpusStore, PlacementRecord};
use crate::types::{Coord, PieceKind, PIECE_CELLS};

/// Which phase produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestReason {
    LineClear,
    NgramFallback,
}

impl SuggestReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestReason::LineClear => "line_clear",
            SuggestReason::NgramFallback => "ngram_fallback",
        }
    }
}

/// Advisory target attached to a freshly spawned piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    /// Leftmost column of the suggested resting position.
    pub column: i16,
    /// Quarter turns counter-clockwise from the spawn orientation.
    pub rotation: u8,
    pub reason: SuggestReason,
}

/// Prediction failures, caught by the spawner so spawning never aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictError {
    /// The board has fewer columns than the piece spans.
    BoardTooNarrow { columns: i16, piece_width: i16 },
}

impl PredictError {
    pub fn code(&self) -> &'static str {
        match self {
            PredictError::BoardTooNarrow { .. } => "board_too_narrow",
        }
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::BoardTooNarrow {
                columns,
                piece_width,
            } => write!(
                f,
                "board of {} columns cannot host a piece {} cells wide",
                columns, piece_width
            ),
        }
    }
}

impl std::error::Error for PredictError {}

type NgramTable = HashMap<(PieceKind, PieceKind), HashMap<i16, u32>>;

/// Corpus-backed placement model.
pub struct Predictor {
    records: Vec<PlacementRecord>,
    ngram: NgramTable,
    last_piece_seen: Option<PieceKind>,
    store: CorpusStore,
}

impl Predictor {
    /// Load the store's records and build the frequency table from them.
    pub fn new(store: CorpusStore) -> Self {
        let records = store.load();
        let (ngram, last_piece_seen) = build_ngram(&records);
        Self {
            records,
            ngram,
            last_piece_seen,
            store,
        }
    }

    pub fn records(&self) -> &[PlacementRecord] {
        &self.records
    }

    pub fn last_piece_seen(&self) -> Option<PieceKind> {
        self.last_piece_seen
    }

    /// Suggest a column and rotation for `kind` on the current stack.
    pub fn predict(&mut self, board: &Board, kind: PieceKind) -> Result<Suggestion, PredictError> {
        if let Some(hit) = find_line_completion(board, kind) {
            self.last_piece_seen = Some(kind);
            return Ok(hit);
        }

        let column = self
            .last_piece_seen
            .and_then(|prev| self.ngram.get(&(prev, kind)))
            .and_then(most_frequent_column)
            .unwrap_or(0);
        let base = shape::cells(kind);
        let column = match clamp_column(board, &base, column) {
            Some(column) => column,
            None => {
                return Err(PredictError::BoardTooNarrow {
                    columns: board.columns(),
                    piece_width: shape::width(&base),
                })
            }
        };

        self.last_piece_seen = Some(kind);
        Ok(Suggestion {
            column,
            rotation: 0,
            reason: SuggestReason::NgramFallback,
        })
    }

    /// Record an accepted placement. Skips exact duplicates; otherwise
    /// appends, persists the full record set, and rebuilds the frequency
    /// table synchronously so the next prediction sees it.
    pub fn write_pattern(&mut self, record: PlacementRecord) -> bool {
        let duplicate = self.records.iter().any(|existing| {
            existing.same_placement(record.piece, &record.landed_coordinates, record.rotation)
        });
        if duplicate {
            return false;
        }
        self.records.push(record);
        self.store.persist(&self.records);
        let (ngram, last_piece_seen) = build_ngram(&self.records);
        self.ngram = ngram;
        self.last_piece_seen = last_piece_seen;
        true
    }
}

/// Resting cells a suggestion points at, for display overlays. `board`
/// must hold the landed stack only, without the falling piece.
pub fn resting_cells(
    board: &Board,
    kind: PieceKind,
    suggestion: &Suggestion,
) -> Option<ArrayVec<Coord, PIECE_CELLS>> {
    let cells = shape::rotated(shape::cells(kind), suggestion.rotation);
    simulate_drop(board, &cells, suggestion.column)
}

/// Frequency table over (previous, current) kind pairs, counting the
/// leftmost column of each placement, plus the final piece seen. A record
/// without coordinates contributes no count but still advances the chain.
fn build_ngram(records: &[PlacementRecord]) -> (NgramTable, Option<PieceKind>) {
    let mut table = NgramTable::new();
    let mut prev: Option<PieceKind> = None;
    for record in records {
        let left = record.landed_coordinates.iter().map(|&(x, _)| x).min();
        if let (Some(prev_kind), Some(left)) = (prev, left) {
            *table
                .entry((prev_kind, record.piece))
                .or_default()
                .entry(left)
                .or_insert(0) += 1;
        }
        prev = Some(record.piece);
    }
    (table, prev)
}

/// Most frequent column; ties resolve to the smallest column.
fn most_frequent_column(table: &HashMap<i16, u32>) -> Option<i16> {
    table
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(&column, _)| column)
}

/// First (rotation, column) drop that completes a row, rotations outer,
/// columns inner. First found wins; no scoring across alternatives.
fn find_line_completion(board: &Board, kind: PieceKind) -> Option<Suggestion> {
    let base = shape::cells(kind);
    for rotation in 0..4u8 {
        let cells = shape::rotated(base, rotation);
        for column in 0..board.columns() {
            let rest = match simulate_drop(board, &cells, column) {
                Some(rest) => rest,
                None => continue,
            };
            if completes_line(board, &rest, kind) {
                let column = rest.iter().map(|&(x, _)| x).min().unwrap_or(0);
                return Some(Suggestion {
                    column,
                    rotation,
                    reason: SuggestReason::LineClear,
                });
            }
        }
    }
    None
}

/// Clamp a starting column so the shape's right edge stays on the board.
/// `None` when the shape is wider than the board.
fn clamp_column(board: &Board, cells: &[Coord], column: i16) -> Option<i16> {
    let max_shift = board.columns() - 1 - shape::max_x(cells);
    if max_shift < 0 {
        return None;
    }
    Some(column.clamp(0, max_shift))
}

/// Resting cells of a vertical drop at `column`: step down until the next
/// row would leave the grid or hit an occupied cell.
fn simulate_drop(
    board: &Board,
    cells: &[Coord],
    column: i16,
) -> Option<ArrayVec<Coord, PIECE_CELLS>> {
    let shift = clamp_column(board, cells, column)?;
    let mut y_off: i16 = 0;
    loop {
        let next_blocked = cells.iter().any(|&(x, y)| {
            let nx = x + shift;
            let ny = y + y_off + 1;
            ny >= board.rows() || board.is_occupied(nx, ny)
        });
        if next_blocked {
            break;
        }
        y_off += 1;
    }
    Some(cells.iter().map(|&(x, y)| (x + shift, y + y_off)).collect())
}

/// Whether dropping `cells` onto a copy of the board fills any row.
fn completes_line(board: &Board, cells: &[Coord], kind: PieceKind) -> bool {
    let mut probe = board.clone();
    probe.occupy(cells, kind);
    (0..probe.rows()).any(|y| probe.is_row_full(y))
}
