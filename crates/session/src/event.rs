//! Events broadcast to session observers.
//!
//! Serialized as one JSON object per event with a `type` tag, so a renderer
//! or a network relay can consume them as JSON lines.

use serde::{Deserialize, Serialize};

use tetrecs_core::pieces::Pattern;
use tetrecs_core::GameEvent;
use tetrecs_types::{Coord, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    NextPiece {
        current: PieceKind,
        following: PieceKind,
        pattern: Pattern,
    },
    PieceRotated {
        piece: PieceKind,
        clockwise: bool,
        pattern: Pattern,
    },
    /// Sent after every placement; `cells` is empty when nothing cleared
    LinesCleared { lines: u32, cells: Vec<Coord> },
    LevelUp { from: u32, to: u32 },
    /// Countdown (re)armed; drives a countdown bar
    LoopScheduled { delay_ms: u32 },
    LifeLost { lives: u32 },
    PlacementRejected { x: i32, y: i32 },
    GameOver { name: String, score: u32 },
    Stopped,
}

impl From<GameEvent> for SessionEvent {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::NextPiece { current, following } => SessionEvent::NextPiece {
                current: current.kind(),
                following: following.kind(),
                pattern: *current.pattern(),
            },
            GameEvent::PieceRotated { piece, clockwise } => SessionEvent::PieceRotated {
                piece: piece.kind(),
                clockwise,
                pattern: *piece.pattern(),
            },
            GameEvent::LinesCleared(clear) => {
                let mut cells: Vec<Coord> = clear.cleared.into_iter().collect();
                cells.sort();
                SessionEvent::LinesCleared {
                    lines: clear.lines,
                    cells,
                }
            }
            GameEvent::LevelUp { from, to } => SessionEvent::LevelUp { from, to },
            GameEvent::LoopScheduled { delay_ms } => SessionEvent::LoopScheduled { delay_ms },
            GameEvent::LifeLost { lives } => SessionEvent::LifeLost { lives },
            GameEvent::PlacementRejected { x, y } => SessionEvent::PlacementRejected { x, y },
            GameEvent::GameOver(record) => SessionEvent::GameOver {
                name: record.name,
                score: record.score,
            },
            GameEvent::Stopped => SessionEvent::Stopped,
        }
    }
}

impl SessionEvent {
    /// Encode as a single JSON line (no trailing newline)
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
