use thiserror::Error;

use tetrecs_core::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The session task has finished (game over, stopped, or dropped)
    #[error("session closed")]
    Closed,

    #[error(transparent)]
    Rejected(#[from] CoreError),
}
