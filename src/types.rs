//! Core types shared across the application
//! This module contains pure data types with no heavy dependencies

use serde::{Deserialize, Serialize};

/// Default board dimensions (cells)
pub const DEFAULT_COLUMNS: i16 = 10;
pub const DEFAULT_ROWS: i16 = 20;

/// Game timing constants (in milliseconds)
pub const TICK_MS: u64 = 16;
pub const DEFAULT_GRAVITY_MS: u64 = 500;

/// Combo cooldown window (in milliseconds), consumed by clear-free ticks
pub const DEFAULT_COMBO_WINDOW_MS: u64 = 1000;

/// Upcoming-piece lookahead
pub const DEFAULT_QUEUE_LOOKAHEAD: usize = 3;
pub const MAX_QUEUE_LOOKAHEAD: usize = 16;

/// Cells per tetromino
pub const PIECE_CELLS: usize = 4;

/// Upper bound on buffered input events per tick
pub const INPUT_BATCH_MAX: usize = 32;

/// Tetromino piece kinds
///
/// Serialized as their single-letter names in corpus records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    O,
    I,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// All seven kinds, in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::O,
        PieceKind::I,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "O" => Some(PieceKind::O),
            "I" => Some(PieceKind::I),
            "T" => Some(PieceKind::T),
            "L" => Some(PieceKind::L),
            "J" => Some(PieceKind::J),
            "S" => Some(PieceKind::S),
            "Z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to the single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::O => "O",
            PieceKind::I => "I",
            PieceKind::T => "T",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }
}

/// Game actions consumed by the controller, one batch per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    MoveDown,
    HardDrop,
    RotateCw,
    RotateCcw,
}

/// Board coordinate, x before y, y grows downward
pub type Coord = (i16, i16);

/// Cell on the board (None = empty, Some = filled with piece kind)
pub type Cell = Option<PieceKind>;
