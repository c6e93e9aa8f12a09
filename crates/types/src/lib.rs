//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the rules engine, the session
//! actor, and any rendering or network layer that consumes session events.
//!
//! # Grid Dimensions
//!
//! The default playfield is a 5x5 grid:
//!
//! - **Columns**: 5 (indexed 0-4, left to right)
//! - **Rows**: 5 (indexed 0-4, top to bottom)
//!
//! Cell values are `0` for empty and `1..=PIECE_COUNT` for a piece color.
//!
//! # Countdown Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DELAY_MS` | 12000 | Countdown at level 0 |
//! | `DELAY_STEP_MS` | 500 | Reduction per level |
//! | `MIN_DELAY_MS` | 2500 | Floor for the countdown |
//! | `SCORE_PER_LEVEL` | 1000 | Points needed per level |
//! | `STARTING_LIVES` | 3 | Lives at session start |
//!
//! # Examples
//!
//! ```
//! use tetrecs_types::{Command, PieceKind, PIECE_COUNT};
//!
//! let kind = PieceKind::from_index(2).unwrap();
//! assert_eq!(kind, PieceKind::Plus);
//! assert_eq!(kind.color(), 3);
//! assert_eq!(PieceKind::from_color(3), Some(PieceKind::Plus));
//!
//! assert_eq!(Command::from_str("place 1 3"), Some(Command::Place { x: 1, y: 3 }));
//! assert_eq!(PIECE_COUNT, 15);
//! ```

use serde::{Deserialize, Serialize};

/// Default grid width in cells
pub const GRID_COLS: u8 = 5;

/// Default grid height in cells
pub const GRID_ROWS: u8 = 5;

/// Number of piece shapes in the catalog
pub const PIECE_COUNT: usize = 15;

/// Value stored in an empty cell
pub const EMPTY_CELL: u8 = 0;

/// Countdown before a timeout at level 0
pub const BASE_DELAY_MS: u32 = 12_000;

/// Countdown reduction per level
pub const DELAY_STEP_MS: u32 = 500;

/// Lowest the countdown can go
pub const MIN_DELAY_MS: u32 = 2_500;

/// Score needed per level
pub const SCORE_PER_LEVEL: u32 = 1_000;

/// Points per cleared cell, before line count and multiplier
pub const POINTS_PER_CELL: u32 = 10;

/// Lives at the start of a session
pub const STARTING_LIVES: u32 = 3;

/// Default player name on score records
pub const DEFAULT_PLAYER: &str = "Player";

/// The fifteen piece shapes of the catalog, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PieceKind {
    Line,
    C,
    Plus,
    Dot,
    Square,
    L,
    J,
    S,
    Z,
    T,
    X,
    Corner,
    InverseCorner,
    Double,
    Triple,
}

/// Catalog order. `ALL_PIECES[i]` has identifier `i`.
pub const ALL_PIECES: [PieceKind; PIECE_COUNT] = [
    PieceKind::Line,
    PieceKind::C,
    PieceKind::Plus,
    PieceKind::Dot,
    PieceKind::Square,
    PieceKind::L,
    PieceKind::J,
    PieceKind::S,
    PieceKind::Z,
    PieceKind::T,
    PieceKind::X,
    PieceKind::Corner,
    PieceKind::InverseCorner,
    PieceKind::Double,
    PieceKind::Triple,
];

/// Grid value written for each piece, indexed by identifier.
///
/// `0` is reserved for empty cells, so the table is `1..=PIECE_COUNT`.
pub const PIECE_COLORS: [u8; PIECE_COUNT] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

impl PieceKind {
    /// Look up a piece by catalog identifier.
    pub fn from_index(index: usize) -> Option<Self> {
        ALL_PIECES.get(index).copied()
    }

    /// Catalog identifier, `0..PIECE_COUNT`.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Grid value for this piece.
    pub fn color(&self) -> u8 {
        PIECE_COLORS[self.index()]
    }

    /// Inverse of [`PieceKind::color`]. Returns `None` for `0` and unknown values.
    pub fn from_color(value: u8) -> Option<Self> {
        PIECE_COLORS
            .iter()
            .position(|&c| c == value)
            .and_then(Self::from_index)
    }

    /// Display name
    ///
    /// ```
    /// use tetrecs_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::InverseCorner.name(), "Inverse Corner");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::Line => "Line",
            PieceKind::C => "C",
            PieceKind::Plus => "Plus",
            PieceKind::Dot => "Dot",
            PieceKind::Square => "Square",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::T => "T",
            PieceKind::X => "X",
            PieceKind::Corner => "Corner",
            PieceKind::InverseCorner => "Inverse Corner",
            PieceKind::Double => "Double",
            PieceKind::Triple => "Triple",
        }
    }
}

/// A grid position: `x` is the column, `y` is the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Discrete player actions, translated from raw input by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place the current piece centered on `(x, y)`
    Place { x: i32, y: i32 },
    /// Rotate the current piece 90° clockwise
    Rotate,
    /// Rotate the current piece 90° counter-clockwise
    RotateReversed,
    /// Swap current and following pieces
    Swap,
    /// End the session
    Stop,
}

impl Command {
    /// Parse a command from a whitespace separated line
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrecs_types::Command;
    ///
    /// assert_eq!(Command::from_str("rotate"), Some(Command::Rotate));
    /// assert_eq!(Command::from_str("ROTATEREVERSED"), Some(Command::RotateReversed));
    /// assert_eq!(Command::from_str("place 0 4"), Some(Command::Place { x: 0, y: 4 }));
    /// assert_eq!(Command::from_str("place 0"), None);
    /// assert_eq!(Command::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let mut parts = s.split_whitespace();
        let head = parts.next()?.to_lowercase();
        let command = match head.as_str() {
            "place" => {
                let x = parts.next()?.parse().ok()?;
                let y = parts.next()?.parse().ok()?;
                Command::Place { x, y }
            }
            "rotate" => Command::Rotate,
            "rotatereversed" => Command::RotateReversed,
            "swap" => Command::Swap,
            "stop" => Command::Stop,
            _ => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(command)
    }

    /// Name of the command, without arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Place { .. } => "place",
            Command::Rotate => "rotate",
            Command::RotateReversed => "rotateReversed",
            Command::Swap => "swap",
            Command::Stop => "stop",
        }
    }
}

/// Final `(name, score)` pair handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
}

impl ScoreRecord {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_defaults() {
        assert_eq!(BASE_DELAY_MS, 12_000);
        assert_eq!(DELAY_STEP_MS, 500);
        assert_eq!(MIN_DELAY_MS, 2_500);
        assert_eq!(SCORE_PER_LEVEL, 1_000);
        assert_eq!(STARTING_LIVES, 3);
    }

    #[test]
    fn color_table_is_identifier_plus_one() {
        for (i, kind) in ALL_PIECES.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(kind.color() as usize, i + 1);
            assert_eq!(PieceKind::from_color(kind.color()), Some(*kind));
        }
        assert_eq!(PieceKind::from_color(EMPTY_CELL), None);
        assert_eq!(PieceKind::from_color(16), None);
        assert_eq!(PieceKind::from_index(PIECE_COUNT), None);
    }

    #[test]
    fn command_rejects_trailing_args() {
        assert_eq!(Command::from_str("swap now"), None);
        assert_eq!(Command::from_str("place 1 2 3"), None);
        assert_eq!(Command::from_str(""), None);
        assert_eq!(Command::from_str("  stop  "), Some(Command::Stop));
    }
}
