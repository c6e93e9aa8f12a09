use thiserror::Error;

/// Errors surfaced by the rules engine.
///
/// Placement errors are recoverable and leave the game untouched.
/// `InvalidPieceIndex` means a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("cannot play the piece at {x},{y}")]
    InvalidPlacement { x: i32, y: i32 },

    #[error("piece index {0} is outside the catalog")]
    InvalidPieceIndex(usize),

    #[error("no current piece")]
    NoCurrentPiece,

    #[error("game is not running")]
    NotRunning,

    #[error("grid dimensions {cols}x{rows} must be non-zero")]
    InvalidDimensions { cols: u8, rows: u8 },
}

impl CoreError {
    /// Stable machine-readable code
    pub fn code(self) -> &'static str {
        match self {
            CoreError::InvalidPlacement { .. } => "invalid_placement",
            CoreError::InvalidPieceIndex(_) => "invalid_piece_index",
            CoreError::NoCurrentPiece => "no_current_piece",
            CoreError::NotRunning => "not_running",
            CoreError::InvalidDimensions { .. } => "invalid_dimensions",
        }
    }
}
