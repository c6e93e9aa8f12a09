//! Score hand-off at game over.
//!
//! The session only produces a [`ScoreRecord`]; how it is stored is up to the
//! sink. [`RankedScores`] keeps a bounded, ranked list in memory.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use tetrecs_types::ScoreRecord;

/// Receives the final score of a session
pub trait ScoreSink: Send {
    fn submit(&mut self, record: &ScoreRecord) -> Result<()>;
}

/// Highest scores first, bounded length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedScores {
    limit: usize,
    entries: Vec<ScoreRecord>,
}

impl RankedScores {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            entries: Vec::new(),
        }
    }

    /// Insert a record. Equal scores keep earlier entries ahead.
    /// Returns the rank (0-based), or `None` if it did not make the list.
    pub fn insert(&mut self, record: ScoreRecord) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < record.score)
            .unwrap_or(self.entries.len());
        if rank >= self.limit {
            return None;
        }
        self.entries.insert(rank, record);
        self.entries.truncate(self.limit);
        Some(rank)
    }

    /// Would this score make the list?
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < self.limit || self.entries.iter().any(|e| e.score < score)
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    pub fn best(&self) -> Option<&ScoreRecord> {
        self.entries.first()
    }
}

impl Default for RankedScores {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ScoreSink for RankedScores {
    fn submit(&mut self, record: &ScoreRecord) -> Result<()> {
        self.insert(record.clone());
        Ok(())
    }
}

/// Lets the caller keep a handle on a sink the session owns
impl<S: ScoreSink> ScoreSink for Arc<Mutex<S>> {
    fn submit(&mut self, record: &ScoreRecord) -> Result<()> {
        let mut inner = self
            .lock()
            .map_err(|_| anyhow!("score sink mutex poisoned"))?;
        inner.submit(record)
    }
}
