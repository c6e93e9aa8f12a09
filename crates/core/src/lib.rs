//! Core rules engine - pure, deterministic, and testable
//!
//! This crate contains every rule of the grid puzzle: the piece catalog, the
//! grid, line resolution, scoring, and the countdown state machine. It has
//! **no dependencies** on a clock or on any I/O:
//!
//! - **Deterministic**: the same seed draws the same pieces
//! - **Testable**: time is fed in through [`GameState::tick`]
//! - **Portable**: any owner (an async actor, a UI loop, a test) can drive it
//!
//! # Module Structure
//!
//! - [`pieces`]: the 15-piece catalog and quarter-turn rotation
//! - [`grid`]: the playfield with placement validation
//! - [`lines`]: full row/column detection and clearing
//! - [`scoring`]: points, levels, and countdown length
//! - [`rng`]: seeded uniform piece drawing
//! - [`game`]: the complete state machine
//! - [`snapshot`]: read-only copies for renderers and planners
//!
//! # Game Rules
//!
//! - A piece is placed by its center cell; every occupied cell must land on an empty, in-bounds cell.
//! - After each placement, every full row **and** column is cleared at once.
//! - A clear scores `lines × cells × 10 × multiplier`; the multiplier then grows by one.
//!   A placement that clears nothing resets it to 1.
//! - Level is `score / 1000`; the countdown is `max(2500, 12000 - 500 × level)` ms.
//! - When the countdown runs out the player loses a life and the current piece is discarded.
//!   The game ends when lives reach zero.
//!
//! # Example
//!
//! ```
//! use tetrecs_core::{GameState, LoopState};
//!
//! let mut game = GameState::new(12345);
//! game.start();
//! assert_eq!(game.state(), LoopState::Running);
//! assert_eq!(game.countdown_remaining_ms(), Some(12_000));
//!
//! // Nobody plays: three timeouts end the game.
//! for _ in 0..3 {
//!     game.tick(12_000);
//! }
//! assert_eq!(game.state(), LoopState::GameOver);
//! assert_eq!(game.lives(), 0);
//! ```

pub mod error;
pub mod game;
pub mod grid;
pub mod lines;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetrecs_types as types;

// Re-export commonly used types for convenience
pub use error::CoreError;
pub use game::{GameConfig, GameEvent, GameState, LoopState, TimeoutOutcome};
pub use grid::Grid;
pub use lines::{resolve_lines, LineClear};
pub use pieces::{create_piece, rotate, rotate_reversed, Piece};
pub use rng::{PieceSource, SimpleRng};
pub use scoring::{level_for_score, line_clear_points, timer_delay_ms};
pub use snapshot::GameSnapshot;
