//! Line resolver - finds and clears full rows and columns after a placement

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::grid::Grid;
use crate::types::{Coord, EMPTY_CELL};

/// Result of one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineClear {
    /// Full rows plus full columns. Shared cells do not reduce the count.
    pub lines: u32,
    /// Every cleared cell, each recorded once
    pub cleared: HashSet<Coord>,
    /// Indices of the full rows, ascending
    pub rows: Vec<u8>,
    /// Indices of the full columns, ascending
    pub cols: Vec<u8>,
}

impl LineClear {
    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }

    /// Number of distinct cells cleared
    pub fn cell_count(&self) -> usize {
        self.cleared.len()
    }
}

/// Clear every full row and column of `grid`.
///
/// Membership is decided on the board as it was before any cell is zeroed.
pub fn resolve_lines(grid: &mut Grid) -> LineClear {
    let rows: Vec<u8> = (0..grid.rows()).filter(|&y| grid.is_row_full(y)).collect();
    let cols: Vec<u8> = (0..grid.cols()).filter(|&x| grid.is_col_full(x)).collect();

    if rows.is_empty() && cols.is_empty() {
        return LineClear::default();
    }

    let mut cleared = HashSet::new();
    for &y in &rows {
        cleared.extend((0..grid.cols()).map(|x| Coord::new(x, y)));
    }
    for &x in &cols {
        cleared.extend((0..grid.rows()).map(|y| Coord::new(x, y)));
    }

    for c in &cleared {
        grid.set(c.x as i32, c.y as i32, EMPTY_CELL);
    }

    let lines = (rows.len() + cols.len()) as u32;
    info!(lines, cells = cleared.len(), ?rows, ?cols, "lines cleared");

    LineClear {
        lines,
        cleared,
        rows,
        cols,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_full_lines() {
        let mut grid = Grid::from_rows(&[&[1, 0, 1], &[1, 1, 0], &[0, 1, 1]]).unwrap();
        let before = grid.clone();
        let result = resolve_lines(&mut grid);
        assert_eq!(result, LineClear::default());
        assert!(result.is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_crossing_lines_both_count() {
        // Row 1 and column 1 are full; clearing the row first must not unfill the column.
        let mut grid = Grid::from_rows(&[&[0, 2, 0], &[3, 3, 3], &[0, 2, 0]]).unwrap();
        let result = resolve_lines(&mut grid);
        assert_eq!(result.lines, 2);
        assert_eq!(result.cell_count(), 5);
        assert_eq!(result.rows, vec![1]);
        assert_eq!(result.cols, vec![1]);
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_full_board_clears_everything() {
        let mut grid = Grid::from_rows(&[&[1, 1], &[1, 1]]).unwrap();
        let result = resolve_lines(&mut grid);
        assert_eq!(result.lines, 4);
        assert_eq!(result.cell_count(), 4);
        assert_eq!(grid.filled_count(), 0);
    }
}
