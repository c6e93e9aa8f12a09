//! TetrECS autoplay runner (default binary).
//!
//! Starts one session, plays it with the placement planner, and writes every
//! session event to stdout as a JSON line. Logs go to stderr; set `RUST_LOG`
//! to change the filter.
//!
//! Besides the `TETRECS_*` session variables, `TETRECS_MAX_MOVES` bounds the
//! number of placements (default 200) before the session is stopped.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use tetrecs::core::{GameSnapshot, LineClear, LoopState};
use tetrecs::engine::{plan_from_snapshot, PlacePlan, PlanError};
use tetrecs::session::{RankedScores, SessionConfig, SessionError, SessionEvent, SessionRuntime};
use tetrecs::types::ScoreRecord;

const DEFAULT_MAX_MOVES: u32 = 200;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    #[serde(rename = "type")]
    kind: &'static str,
    state: LoopState,
    moves: u32,
    name: String,
    score: u32,
    level: u32,
    lives: u32,
    high_scores: Vec<ScoreRecord>,
}

fn emit(out: &mut impl Write, event: &SessionEvent) -> Result<()> {
    writeln!(out, "{}", event.to_json_line()?)?;
    Ok(())
}

fn emit_all(out: &mut impl Write, runtime: &mut SessionRuntime) -> Result<()> {
    for event in runtime.drain_events() {
        emit(out, &event)?;
    }
    Ok(())
}

/// Block until a new piece shows up or the game ends. Returns false on end.
fn wait_for_piece(out: &mut impl Write, runtime: &mut SessionRuntime) -> Result<bool> {
    while let Some(event) = runtime.next_event() {
        emit(out, &event)?;
        match event {
            SessionEvent::NextPiece { .. } => return Ok(true),
            SessionEvent::GameOver { .. } | SessionEvent::Stopped => return Ok(false),
            _ => {}
        }
    }
    Ok(false)
}

fn execute(runtime: &SessionRuntime, plan: &PlacePlan) -> Result<LineClear, SessionError> {
    if plan.swap {
        runtime.swap()?;
    }
    for _ in 0..plan.rotations {
        runtime.rotate()?;
    }
    runtime.place(plan.x, plan.y)
}

/// Carry out one planned move. Returns false once the session is gone.
fn play_once(
    out: &mut impl Write,
    runtime: &mut SessionRuntime,
    snapshot: &GameSnapshot,
) -> Result<bool> {
    let plan = match plan_from_snapshot(snapshot) {
        Ok(plan) => plan,
        Err(PlanError::NotPlayable) => return Ok(false),
        Err(e @ (PlanError::NoFit | PlanError::NoActive)) => {
            info!(reason = e.code(), "no move available, waiting for the countdown");
            return wait_for_piece(out, runtime);
        }
        Err(e @ PlanError::Malformed) => return Err(anyhow!(e.message())),
    };

    debug!(?plan, "planned move");
    match execute(runtime, &plan) {
        Ok(clear) if !clear.is_empty() => {
            info!(lines = clear.lines, cells = clear.cell_count(), "cleared");
        }
        Ok(_) => {}
        // A timeout may have replaced the piece between snapshot and place.
        Err(SessionError::Rejected(e)) => warn!(error = %e, "planned move rejected"),
        Err(SessionError::Closed) => return Ok(false),
    }
    emit_all(out, runtime)?;
    Ok(true)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig::from_env();
    let max_moves = std::env::var("TETRECS_MAX_MOVES")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_MAX_MOVES);
    info!(seed = config.game.seed, player = %config.game.player, max_moves, "starting autoplay");

    let scores = Arc::new(Mutex::new(RankedScores::default()));
    let mut runtime = SessionRuntime::start(config, Some(Box::new(scores.clone())))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    emit_all(&mut out, &mut runtime)?;

    let mut moves = 0;
    while moves < max_moves {
        let snapshot = match runtime.snapshot() {
            Ok(snapshot) => snapshot,
            Err(SessionError::Closed) => break,
            Err(e) => return Err(e.into()),
        };
        if !play_once(&mut out, &mut runtime, &snapshot)? {
            break;
        }
        moves += 1;
    }

    runtime.stop();
    while let Some(event) = runtime.next_event() {
        emit(&mut out, &event)?;
    }

    let outcome = runtime.wait()?;
    let high_scores = scores
        .lock()
        .map_err(|_| anyhow!("score table mutex poisoned"))?
        .entries()
        .to_vec();
    let summary = Summary {
        kind: "summary",
        state: outcome.state,
        moves,
        name: outcome.record.name,
        score: outcome.record.score,
        level: outcome.snapshot.level,
        lives: outcome.snapshot.lives,
        high_scores,
    };
    writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    Ok(())
}
