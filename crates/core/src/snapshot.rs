use serde::{Deserialize, Serialize};

use crate::game::LoopState;
use crate::grid::Grid;
use crate::pieces::{Pattern, Piece};
use crate::types::PieceKind;

/// Read-only copy of everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub cols: u8,
    pub rows: u8,
    /// `cells[y][x]`
    pub cells: Vec<Vec<u8>>,
    pub current: Option<PieceKind>,
    /// Orientation of the current piece, `pattern[y][x]`
    pub current_pattern: Option<Pattern>,
    pub following: Option<PieceKind>,
    pub following_pattern: Option<Pattern>,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub multiplier: u32,
    pub state: LoopState,
    pub countdown_ms: Option<u32>,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.state == LoopState::Running && self.current.is_some()
    }

    /// Rebuild the grid, `None` if the cells do not form a valid
    /// `cols x rows` grid
    pub fn grid(&self) -> Option<Grid> {
        Grid::from_rows(&self.cells).filter(|g| g.cols() == self.cols && g.rows() == self.rows)
    }

    /// Rebuild the current piece in its current orientation
    pub fn current_piece(&self) -> Option<Piece> {
        Piece::oriented(self.current?, self.current_pattern.as_ref()?)
    }

    pub fn following_piece(&self) -> Option<Piece> {
        Piece::oriented(self.following?, self.following_pattern.as_ref()?)
    }

    /// Cell value at (x, y), `None` out of bounds
    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;

    #[test]
    fn test_grid_rebuilds_from_live_game() {
        let mut game = GameState::new(4);
        game.start();
        let snapshot = game.snapshot();
        assert_eq!(snapshot.grid().as_ref(), Some(game.grid()));
        assert_eq!(snapshot.current_piece().as_ref(), game.current_piece());
    }

    #[test]
    fn test_malformed_cells_give_no_grid() {
        let mut game = GameState::new(4);
        game.start();

        let mut ragged = game.snapshot();
        ragged.cells[2].pop();
        assert_eq!(ragged.grid(), None);

        let mut empty = game.snapshot();
        empty.cells.clear();
        assert_eq!(empty.grid(), None);

        let mut mislabeled = game.snapshot();
        mislabeled.cols = 7;
        assert_eq!(mislabeled.grid(), None);

        let mut bad_value = game.snapshot();
        bad_value.cells[0][0] = 200;
        assert_eq!(bad_value.grid(), None);
    }
}
