//! Session module - one live game behind an async actor
//!
//! A session owns a single [`GameState`](tetrecs_core::GameState) inside a
//! tokio task and serializes everything that mutates it: placements,
//! rotations, swaps, and countdown timeouts.
//!
//! # Overview
//!
//! 1. **Spawn**: [`Session::spawn`] starts the task; the game starts at once
//! 2. **Command**: [`SessionHandle`] sends requests and awaits the replies
//! 3. **Observe**: [`SessionHandle::subscribe`] yields [`SessionEvent`]s
//! 4. **End**: lives run out (the score goes to the [`ScoreSink`]) or
//!    [`SessionHandle::stop`] cancels the session
//!
//! Synchronous callers use [`SessionRuntime`], which owns its own runtime.
//!
//! # Environment Variables
//!
//! See [`SessionConfig::from_env`]: `TETRECS_COLS`, `TETRECS_ROWS`,
//! `TETRECS_SEED`, `TETRECS_LIVES`, `TETRECS_PLAYER`, `TETRECS_QUEUE`,
//! `TETRECS_EVENTS`.

pub mod actor;
pub mod config;
pub mod error;
pub mod event;
pub mod runtime;
pub mod scores;

pub use actor::{CommandReply, Session, SessionHandle, SessionOutcome};
pub use config::SessionConfig;
pub use error::SessionError;
pub use event::SessionEvent;
pub use runtime::SessionRuntime;
pub use scores::{RankedScores, ScoreSink};
