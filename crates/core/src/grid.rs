//! Grid module - the playfield
//!
//! A `cols x rows` matrix of cell values, stored flat in row-major order.
//! `0` is empty, `1..=PIECE_COUNT` is a piece color.
//! Coordinates: (x, y) where x is the column (left to right) and y the row (top to bottom).
//!
//! Placement treats `(x, y)` as the center of the piece's 3x3 pattern, so the
//! pattern's top-left corner lands on `(x - 1, y - 1)`.

use tracing::debug;

use crate::pieces::Piece;
use crate::types::{EMPTY_CELL, GRID_COLS, GRID_ROWS, PIECE_COUNT};

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: u8,
    rows: u8,
    /// Flat array of cells, row-major order (y * cols + x)
    cells: Vec<u8>,
}

impl Grid {
    /// Create an empty grid.
    ///
    /// Panics if either dimension is zero; see [`Grid::try_new`].
    pub fn new(cols: u8, rows: u8) -> Self {
        assert!(cols > 0 && rows > 0, "grid dimensions must be non-zero");
        Self {
            cols,
            rows,
            cells: vec![EMPTY_CELL; cols as usize * rows as usize],
        }
    }

    /// Create an empty grid, `None` if either dimension is zero
    pub fn try_new(cols: u8, rows: u8) -> Option<Self> {
        (cols > 0 && rows > 0).then(|| Self::new(cols, rows))
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.cols as i32 || y < 0 || y >= self.rows as i32 {
            return None;
        }
        Some(y as usize * self.cols as usize + x as usize)
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Cell value at (x, y), or `None` when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Write a cell value.
    /// Returns false if out of bounds or the value is not a valid cell value.
    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        if value as usize > PIECE_COUNT {
            return false;
        }
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(EMPTY_CELL)
    }

    pub fn is_row_full(&self, y: u8) -> bool {
        if y >= self.rows {
            return false;
        }
        let start = y as usize * self.cols as usize;
        self.cells[start..start + self.cols as usize]
            .iter()
            .all(|&v| v != EMPTY_CELL)
    }

    pub fn is_col_full(&self, x: u8) -> bool {
        if x >= self.cols {
            return false;
        }
        self.cells
            .iter()
            .skip(x as usize)
            .step_by(self.cols as usize)
            .all(|&v| v != EMPTY_CELL)
    }

    /// Whether `piece` fits with its center on `(x, y)`
    pub fn can_play(&self, piece: &Piece, x: i32, y: i32) -> bool {
        let (left, top) = (x - 1, y - 1);
        piece
            .blocks()
            .iter()
            .all(|&(dx, dy)| self.is_empty(left + dx as i32, top + dy as i32))
    }

    /// Place `piece` with its center on `(x, y)`.
    /// Returns false and leaves the grid untouched if the piece does not fit.
    pub fn play(&mut self, piece: &Piece, x: i32, y: i32) -> bool {
        if !self.can_play(piece, x, y) {
            debug!(piece = %piece, x, y, "placement does not fit");
            return false;
        }

        let (left, top) = (x - 1, y - 1);
        let color = piece.color();
        for (dx, dy) in piece.blocks() {
            self.set(left + dx as i32, top + dy as i32, color);
        }
        debug!(piece = %piece, x, y, "piece played");
        true
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != EMPTY_CELL).count()
    }

    /// Flat cell slice, row-major
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Iterate rows top to bottom
    pub fn rows_iter(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.cols as usize)
    }

    /// Build a grid from rows of cell values.
    ///
    /// `None` for no rows, empty or ragged rows, more than 255 rows or columns,
    /// or a value that is not a cell value.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Option<Self> {
        let height = u8::try_from(rows.len()).ok()?;
        let width = u8::try_from(rows.first()?.as_ref().len()).ok()?;
        let mut grid = Self::try_new(width, height)?;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width as usize {
                return None;
            }
            for (x, &v) in row.iter().enumerate() {
                if !grid.set(x as i32, y as i32, v) {
                    return None;
                }
            }
        }
        Some(grid)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GRID_COLS, GRID_ROWS)
    }
}
