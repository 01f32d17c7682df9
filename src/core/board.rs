//! Board module - manages the game grid
//!
//! The board is a `columns x rows` grid where each cell is empty or holds
//! the kind of the piece occupying it. Uses flat row-major storage.
//! Coordinates: (x, y) with x growing left to right and y growing top to
//! bottom. Cell writes are pre-validated by the collision logic in
//! `core::piece`; writing out of bounds is an invariant breach and panics.

use crate::types::{Cell, Coord, PieceKind, DEFAULT_COLUMNS, DEFAULT_ROWS};

/// The game grid, sized once at round start and never resized.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    columns: i16,
    rows: i16,
    /// Flat cells in row-major order (y * columns + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board. Dimensions must be positive.
    pub fn new(columns: i16, rows: i16) -> Self {
        assert!(columns > 0 && rows > 0, "board dimensions must be positive");
        Self {
            columns,
            rows,
            cells: vec![None; columns as usize * rows as usize],
        }
    }

    /// Calculate flat index from (x, y), `None` when out of bounds.
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.columns || y < 0 || y >= self.rows {
            return None;
        }
        Some(y as usize * self.columns as usize + x as usize)
    }

    pub fn columns(&self) -> i16 {
        self.columns
    }

    pub fn rows(&self) -> i16 {
        self.rows
    }

    /// Get cell at (x, y). Out-of-bounds positions read as `None`.
    pub fn get(&self, x: i16, y: i16) -> Cell {
        self.index(x, y).and_then(|idx| self.cells[idx])
    }

    /// Whether (x, y) is inside the grid and filled.
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        self.get(x, y).is_some()
    }

    /// Mark every coordinate in `coords` as occupied by `kind`.
    ///
    /// Panics when a coordinate is out of bounds: callers validate moves
    /// through the collision probe before writing.
    pub fn occupy(&mut self, coords: &[Coord], kind: PieceKind) {
        for &(x, y) in coords {
            let idx = self
                .index(x, y)
                .unwrap_or_else(|| panic!("occupy out of bounds: ({}, {})", x, y));
            self.cells[idx] = Some(kind);
        }
    }

    /// Empty every coordinate in `coords`. Panics when out of bounds.
    pub fn vacate(&mut self, coords: &[Coord]) {
        for &(x, y) in coords {
            let idx = self
                .index(x, y)
                .unwrap_or_else(|| panic!("vacate out of bounds: ({}, {})", x, y));
            self.cells[idx] = None;
        }
    }

    /// Empty an entire row, regardless of which pieces occupy it.
    pub fn clear_row(&mut self, y: i16) {
        if y < 0 || y >= self.rows {
            return;
        }
        let start = y as usize * self.columns as usize;
        let end = start + self.columns as usize;
        for cell in &mut self.cells[start..end] {
            *cell = None;
        }
    }

    /// Check if a row is completely filled.
    pub fn is_row_full(&self, y: i16) -> bool {
        if y < 0 || y >= self.rows {
            return false;
        }
        let start = y as usize * self.columns as usize;
        let end = start + self.columns as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Number of completely filled rows on the current grid.
    pub fn full_row_count(&self) -> u32 {
        (0..self.rows).filter(|&y| self.is_row_full(y)).count() as u32
    }

    /// Read-only view of the flat cell array, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Read-only view of the grid, one slice per row, top row first.
    pub fn snapshot(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.columns as usize)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}
