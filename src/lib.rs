//! TetrECS (workspace facade crate).
//!
//! Re-exports the workspace crates as `tetrecs::{core,engine,session,types}`
//! so binaries, tests and benches depend on one package.

pub use tetrecs_core as core;
pub use tetrecs_engine as engine;
pub use tetrecs_session as session;
pub use tetrecs_types as types;
