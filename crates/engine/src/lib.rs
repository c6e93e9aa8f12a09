//! Placement search for automated players.
//!
//! Tries every orientation of the current piece (and of the following piece,
//! reached through a swap) at every center position, simulates the line
//! resolution on a copy of the grid, and keeps the best result.

pub mod place;

pub use place::{apply_place, plan_from_snapshot, plan_placement, PlaceError, PlacePlan, PlanError};
