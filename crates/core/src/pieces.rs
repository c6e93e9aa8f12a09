//! Pieces module - the piece catalog and quarter-turn rotation
//!
//! Every piece is a 3x3 occupancy pattern stored row-major as `pattern[y][x]`,
//! with `(1, 1)` as the center cell used for placement.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{PieceKind, PIECE_COUNT};

/// Side length of a piece pattern
pub const PATTERN_SIZE: usize = 3;

/// Occupancy pattern, `pattern[y][x]`
pub type Pattern = [[bool; PATTERN_SIZE]; PATTERN_SIZE];

/// Offset of an occupied cell relative to the pattern's top-left corner
pub type BlockOffset = (i8, i8);

const O: bool = false;
const H: bool = true;

/// Catalog patterns, indexed by piece identifier.
const PATTERNS: [Pattern; PIECE_COUNT] = [
    // Line
    [[O, O, O], [H, H, H], [O, O, O]],
    // C
    [[O, O, O], [H, H, H], [H, O, H]],
    // Plus
    [[O, H, O], [H, H, H], [O, H, O]],
    // Dot
    [[O, O, O], [O, H, O], [O, O, O]],
    // Square
    [[H, H, O], [H, H, O], [O, O, O]],
    // L
    [[O, O, O], [H, H, H], [O, O, H]],
    // J
    [[O, O, H], [H, H, H], [O, O, O]],
    // S
    [[O, O, O], [H, H, O], [O, H, H]],
    // Z
    [[O, H, H], [H, H, O], [O, O, O]],
    // T
    [[H, O, O], [H, H, O], [H, O, O]],
    // X
    [[H, O, H], [O, H, O], [H, O, H]],
    // Corner
    [[O, O, O], [H, H, O], [O, H, O]],
    // Inverse Corner
    [[H, H, O], [H, O, O], [O, O, O]],
    // Double
    [[O, H, O], [O, H, O], [O, O, O]],
    // Triple
    [[O, H, O], [O, H, O], [O, H, O]],
];

/// A drawn piece: catalog identity plus its current orientation.
///
/// Rotation rewrites the pattern in place; kind and color never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    kind: PieceKind,
    pattern: Pattern,
}

impl Piece {
    /// Create a piece in its catalog orientation
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            pattern: PATTERNS[kind.index()],
        }
    }

    /// Rebuild a piece in a given orientation.
    /// Returns `None` if `pattern` is not a rotation of the catalog shape.
    pub fn oriented(kind: PieceKind, pattern: &Pattern) -> Option<Self> {
        let mut piece = Self::new(kind);
        for _ in 0..4 {
            if piece.pattern == *pattern {
                return Some(piece);
            }
            piece.rotate(1);
        }
        None
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Value written into the grid for this piece
    pub fn color(&self) -> u8 {
        self.kind.color()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Occupied cells as `(dx, dy)` offsets from the top-left corner
    pub fn blocks(&self) -> ArrayVec<BlockOffset, 9> {
        let mut out = ArrayVec::new();
        for (dy, row) in self.pattern.iter().enumerate() {
            for (dx, &filled) in row.iter().enumerate() {
                if filled {
                    out.push((dx as i8, dy as i8));
                }
            }
        }
        out
    }

    /// Rotate clockwise by `steps` quarter turns
    pub fn rotate(&mut self, steps: u32) {
        self.pattern = rotate(&self.pattern, steps);
    }

    /// Rotate counter-clockwise by `steps` quarter turns
    pub fn rotate_reversed(&mut self, steps: u32) {
        self.pattern = rotate_reversed(&self.pattern, steps);
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind.name())
    }
}

/// Create a piece by catalog identifier
pub fn create_piece(index: usize) -> Result<Piece, CoreError> {
    PieceKind::from_index(index)
        .map(Piece::new)
        .ok_or(CoreError::InvalidPieceIndex(index))
}

/// Catalog orientation of a piece kind
pub fn get_pattern(kind: PieceKind) -> Pattern {
    PATTERNS[kind.index()]
}

fn quarter_cw(p: &Pattern) -> Pattern {
    let mut out = [[false; PATTERN_SIZE]; PATTERN_SIZE];
    for (y, row) in out.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = p[PATTERN_SIZE - 1 - x][y];
        }
    }
    out
}

fn quarter_ccw(p: &Pattern) -> Pattern {
    let mut out = [[false; PATTERN_SIZE]; PATTERN_SIZE];
    for (y, row) in out.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = p[x][PATTERN_SIZE - 1 - y];
        }
    }
    out
}

/// Rotate a pattern clockwise by `steps × 90°`
pub fn rotate(pattern: &Pattern, steps: u32) -> Pattern {
    let mut out = *pattern;
    for _ in 0..steps % 4 {
        out = quarter_cw(&out);
    }
    out
}

/// Rotate a pattern counter-clockwise by `steps × 90°`
pub fn rotate_reversed(pattern: &Pattern, steps: u32) -> Pattern {
    let mut out = *pattern;
    for _ in 0..steps % 4 {
        out = quarter_ccw(&out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ALL_PIECES;

    #[test]
    fn test_create_piece_bounds() {
        for i in 0..PIECE_COUNT {
            let piece = create_piece(i).unwrap();
            assert_eq!(piece.kind().index(), i);
            assert_eq!(piece.color() as usize, i + 1);
        }
        assert_eq!(
            create_piece(PIECE_COUNT),
            Err(CoreError::InvalidPieceIndex(PIECE_COUNT))
        );
    }

    #[test]
    fn test_rotate_moves_top_row_to_right_column() {
        let top = [[H, H, H], [O, O, O], [O, O, O]];
        let right = [[O, O, H], [O, O, H], [O, O, H]];
        let left = [[H, O, O], [H, O, O], [H, O, O]];
        assert_eq!(rotate(&top, 1), right);
        assert_eq!(rotate_reversed(&top, 1), left);
    }

    #[test]
    fn test_rotate_and_reverse_cancel() {
        for kind in ALL_PIECES {
            let p = get_pattern(kind);
            assert_eq!(rotate_reversed(&rotate(&p, 1), 1), p);
            assert_eq!(rotate(&p, 3), rotate_reversed(&p, 1));
        }
    }

    #[test]
    fn test_rotation_preserves_block_count() {
        for kind in ALL_PIECES {
            let mut piece = Piece::new(kind);
            let count = piece.blocks().len();
            piece.rotate(1);
            assert_eq!(piece.blocks().len(), count);
            assert_eq!(piece.kind(), kind);
        }
    }

    #[test]
    fn test_oriented_only_accepts_rotations() {
        let mut turned = Piece::new(PieceKind::J);
        turned.rotate(3);
        assert_eq!(Piece::oriented(PieceKind::J, turned.pattern()), Some(turned));
        assert_eq!(Piece::oriented(PieceKind::J, &get_pattern(PieceKind::X)), None);
    }

    #[test]
    fn test_steps_reduce_modulo_four() {
        let p = get_pattern(PieceKind::L);
        assert_eq!(rotate(&p, 9), rotate(&p, 1));
        assert_eq!(rotate(&p, 0), p);
    }
}
