//! Scoring module - points, levels, and the countdown length
//!
//! - A clear scores `lines × cells × 10 × multiplier`.
//! - Level is `score / 1000`.
//! - The countdown is `12000 - 500 × level` ms, floored at 2500 ms.

use crate::types::{BASE_DELAY_MS, DELAY_STEP_MS, MIN_DELAY_MS, POINTS_PER_CELL, SCORE_PER_LEVEL};

/// Points for one resolution pass
/// lines: full rows plus full columns
/// cells: distinct cells cleared
/// multiplier: combo value in effect before this clear
pub fn line_clear_points(lines: u32, cells: usize, multiplier: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    let cells = u32::try_from(cells).unwrap_or(u32::MAX);
    lines
        .saturating_mul(cells)
        .saturating_mul(POINTS_PER_CELL)
        .saturating_mul(multiplier)
}

/// Level reached at a given score
pub fn level_for_score(score: u32) -> u32 {
    score / SCORE_PER_LEVEL
}

/// Countdown length in milliseconds for a level
pub fn timer_delay_ms(level: u32) -> u32 {
    BASE_DELAY_MS
        .saturating_sub(DELAY_STEP_MS.saturating_mul(level))
        .max(MIN_DELAY_MS)
}
