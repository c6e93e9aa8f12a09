//! Session configuration, read from the environment.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use tetrecs_core::GameConfig;
use tetrecs_types::{DEFAULT_PLAYER, GRID_COLS, GRID_ROWS, STARTING_LIVES};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub game: GameConfig,
    /// Pending requests before callers wait
    pub queue_capacity: usize,
    /// Events buffered per subscriber before the oldest are dropped
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            queue_capacity: 32,
            event_capacity: 256,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

impl SessionConfig {
    /// Create from environment variables.
    ///
    /// Unset, empty or unparsable values fall back to defaults. Without
    /// `TETRECS_SEED` the seed comes from the clock.
    pub fn from_env() -> Self {
        let cols = parse_var::<u8>("TETRECS_COLS")
            .filter(|&c| c > 0)
            .unwrap_or(GRID_COLS);
        let rows = parse_var::<u8>("TETRECS_ROWS")
            .filter(|&r| r > 0)
            .unwrap_or(GRID_ROWS);
        let seed = parse_var("TETRECS_SEED").unwrap_or_else(time_seed);
        let lives = parse_var("TETRECS_LIVES").unwrap_or(STARTING_LIVES);

        let player = env::var("TETRECS_PLAYER")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .unwrap_or_else(|| DEFAULT_PLAYER.to_string());

        let queue_capacity = parse_var::<usize>("TETRECS_QUEUE").unwrap_or(32).max(1);
        let event_capacity = parse_var::<usize>("TETRECS_EVENTS").unwrap_or(256).max(1);

        Self {
            game: GameConfig {
                cols,
                rows,
                seed,
                lives,
                player,
            },
            queue_capacity,
            event_capacity,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.game.seed = seed;
        self
    }

    pub fn with_lives(mut self, lives: u32) -> Self {
        self.game.lives = lives;
        self
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.game.player = player.into();
        self
    }
}
