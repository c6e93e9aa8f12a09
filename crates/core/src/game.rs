//! Game module - the complete rules state machine
//!
//! Ties together the grid, the piece source, line resolution and scoring, and
//! tracks the countdown that costs a life when the player does not act in time.
//!
//! `GameState` is synchronous and owns no clock. Time enters through [`GameState::tick`],
//! so whoever owns the game decides how it is scheduled. Observers read the
//! events queued during each call through [`GameState::take_events`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::grid::Grid;
use crate::lines::{resolve_lines, LineClear};
use crate::pieces::Piece;
use crate::rng::PieceSource;
use crate::scoring::{level_for_score, line_clear_points, timer_delay_ms};
use crate::snapshot::GameSnapshot;
use crate::types::{ScoreRecord, DEFAULT_PLAYER, GRID_COLS, GRID_ROWS, STARTING_LIVES};

/// Countdown loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoopState {
    /// Created, not started yet
    Idle,
    /// Accepting placements, countdown armed
    Running,
    /// Lives ran out
    GameOver,
    /// Stopped on request
    Stopped,
}

/// Something observers may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The current piece changed (advance or swap)
    NextPiece { current: Piece, following: Piece },
    /// The current piece was rotated
    PieceRotated { piece: Piece, clockwise: bool },
    /// Scoring pass after a placement; `cleared` may be empty
    LinesCleared(LineClear),
    /// Level rose above the highest level reached so far
    LevelUp { from: u32, to: u32 },
    /// The countdown was (re)armed
    LoopScheduled { delay_ms: u32 },
    /// A timeout cost a life
    LifeLost { lives: u32 },
    /// A placement did not fit
    PlacementRejected { x: i32, y: i32 },
    /// Lives reached zero
    GameOver(ScoreRecord),
    /// The game was stopped on request
    Stopped,
}

/// What a timeout did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeoutOutcome {
    /// A life was lost and the countdown re-armed
    Continue { delay_ms: u32 },
    /// The last life was lost
    GameOver(ScoreRecord),
}

/// Construction parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub cols: u8,
    pub rows: u8,
    pub seed: u32,
    pub lives: u32,
    pub player: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: GRID_COLS,
            rows: GRID_ROWS,
            seed: 1,
            lives: STARTING_LIVES,
            player: DEFAULT_PLAYER.to_string(),
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    source: PieceSource,
    current: Option<Piece>,
    following: Option<Piece>,
    score: u32,
    level: u32,
    /// Highest level ever announced, so each threshold fires once
    level_reached: u32,
    lives: u32,
    multiplier: u32,
    state: LoopState,
    /// Remaining countdown; `None` when no timeout is pending
    countdown_ms: Option<u32>,
    starting_lives: u32,
    player: String,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a 5x5 game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::build(
            Grid::default(),
            GameConfig {
                seed,
                ..GameConfig::default()
            },
        )
    }

    /// Create a game from a configuration.
    /// Fails with `InvalidDimensions` when either grid dimension is zero.
    pub fn with_config(config: GameConfig) -> Result<Self, CoreError> {
        let grid = Grid::try_new(config.cols, config.rows).ok_or(CoreError::InvalidDimensions {
            cols: config.cols,
            rows: config.rows,
        })?;
        Ok(Self::build(grid, config))
    }

    fn build(grid: Grid, config: GameConfig) -> Self {
        Self {
            grid,
            source: PieceSource::new(config.seed),
            current: None,
            following: None,
            score: 0,
            level: 0,
            level_reached: 0,
            lives: config.lives,
            multiplier: 1,
            state: LoopState::Idle,
            countdown_ms: None,
            starting_lives: config.lives,
            player: config.player,
            events: Vec::new(),
        }
    }

    /// Prime the pieces and arm the first countdown. No-op unless idle.
    pub fn start(&mut self) {
        if self.state != LoopState::Idle {
            return;
        }
        info!(cols = self.grid.cols(), rows = self.grid.rows(), seed = self.source.seed(), "starting game");
        self.following = Some(self.spawn_piece());
        self.state = LoopState::Running;
        self.next_piece();
        self.restart_game_loop();
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn following_piece(&self) -> Option<&Piece> {
        self.following.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn seed(&self) -> u32 {
        self.source.seed()
    }

    /// Time left before the next timeout, `None` when none is pending
    pub fn countdown_remaining_ms(&self) -> Option<u32> {
        self.countdown_ms
    }

    /// Countdown length for the current level
    pub fn timer_delay(&self) -> u32 {
        timer_delay_ms(self.level)
    }

    /// Drain events queued since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            cols: self.grid.cols(),
            rows: self.grid.rows(),
            cells: self.grid.rows_iter().map(<[u8]>::to_vec).collect(),
            current: self.current.map(|p| p.kind()),
            current_pattern: self.current.map(|p| *p.pattern()),
            following: self.following.map(|p| p.kind()),
            following_pattern: self.following.map(|p| *p.pattern()),
            score: self.score,
            level: self.level,
            lives: self.lives,
            multiplier: self.multiplier,
            state: self.state,
            countdown_ms: self.countdown_ms,
            seed: self.source.seed(),
        }
    }

    /// Draw a uniformly random piece
    pub fn spawn_piece(&mut self) -> Piece {
        let piece = self.source.draw();
        debug!(piece = %piece, "picked random piece");
        piece
    }

    /// Promote the following piece to current and draw a new following piece
    pub fn next_piece(&mut self) -> Piece {
        let current = match self.following.take() {
            Some(p) => p,
            None => self.spawn_piece(),
        };
        let following = self.spawn_piece();
        self.current = Some(current);
        self.following = Some(following);
        debug!(current = %current, following = %following, "next piece");
        self.events.push(GameEvent::NextPiece { current, following });
        current
    }

    /// Swap current and following without drawing
    pub fn swap_current_piece(&mut self) -> bool {
        let (Some(current), Some(following)) = (self.current, self.following) else {
            return false;
        };
        self.current = Some(following);
        self.following = Some(current);
        debug!(current = %following, "swapped pieces");
        self.events.push(GameEvent::NextPiece {
            current: following,
            following: current,
        });
        true
    }

    /// Rotate the current piece a quarter turn clockwise
    pub fn rotate_current_piece(&mut self) -> bool {
        self.rotate_current(true)
    }

    /// Rotate the current piece a quarter turn counter-clockwise
    pub fn reversed_rotate_current_piece(&mut self) -> bool {
        self.rotate_current(false)
    }

    fn rotate_current(&mut self, clockwise: bool) -> bool {
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        if clockwise {
            piece.rotate(1);
        } else {
            piece.rotate_reversed(1);
        }
        let piece = *piece;
        debug!(piece = %piece, clockwise, "rotated current piece");
        self.events.push(GameEvent::PieceRotated { piece, clockwise });
        true
    }

    /// Place the current piece centered on `(x, y)`.
    ///
    /// On success the countdown restarts, full lines are cleared and scored,
    /// and the next piece comes in. On failure nothing changes.
    pub fn block_clicked(&mut self, x: i32, y: i32) -> Result<LineClear, CoreError> {
        if self.state != LoopState::Running {
            return Err(CoreError::NotRunning);
        }
        let piece = self.current.ok_or(CoreError::NoCurrentPiece)?;

        if !self.grid.can_play(&piece, x, y) {
            warn!(piece = %piece, x, y, "cannot play piece");
            self.events.push(GameEvent::PlacementRejected { x, y });
            return Err(CoreError::InvalidPlacement { x, y });
        }

        self.grid.play(&piece, x, y);
        self.restart_game_loop();
        let clear = self.after_piece();
        self.next_piece();
        Ok(clear)
    }

    /// Resolve full lines and score them
    fn after_piece(&mut self) -> LineClear {
        let clear = resolve_lines(&mut self.grid);
        self.apply_score(&clear);
        clear
    }

    /// Score a resolution pass and notify line-cleared observers.
    pub fn score_lines(&mut self, clear: LineClear) {
        self.apply_score(&clear);
    }

    fn apply_score(&mut self, clear: &LineClear) {
        if clear.lines > 0 {
            let points = line_clear_points(clear.lines, clear.cell_count(), self.multiplier);
            self.score = self.score.saturating_add(points);
            self.multiplier = self.multiplier.saturating_add(1);
            self.update_level();
            info!(
                lines = clear.lines,
                points,
                score = self.score,
                multiplier = self.multiplier,
                "scored clear"
            );
        } else {
            self.multiplier = 1;
        }
        self.events.push(GameEvent::LinesCleared(clear.clone()));
    }

    fn update_level(&mut self) {
        self.level = level_for_score(self.score);
        if self.level > self.level_reached {
            info!(from = self.level_reached, to = self.level, "level up");
            self.events.push(GameEvent::LevelUp {
                from: self.level_reached,
                to: self.level,
            });
            self.level_reached = self.level;
        }
    }

    /// Re-arm the countdown at the current delay
    pub fn restart_game_loop(&mut self) {
        if self.state != LoopState::Running {
            return;
        }
        let delay_ms = self.timer_delay();
        self.countdown_ms = Some(delay_ms);
        debug!(delay_ms, "countdown armed");
        self.events.push(GameEvent::LoopScheduled { delay_ms });
    }

    /// Cancel any pending timeout. Safe to call repeatedly.
    pub fn stop_game_loop(&mut self) {
        self.countdown_ms = None;
    }

    /// Cancel the countdown and end the game. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.stop_game_loop();
        if matches!(self.state, LoopState::Idle | LoopState::Running) {
            info!(score = self.score, "stopping game");
            self.state = LoopState::Stopped;
            self.events.push(GameEvent::Stopped);
        }
    }

    /// Advance the countdown by `elapsed_ms`, firing at most one timeout
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<TimeoutOutcome> {
        if self.state != LoopState::Running {
            return None;
        }
        let remaining = self.countdown_ms?.saturating_sub(elapsed_ms);
        if remaining > 0 {
            self.countdown_ms = Some(remaining);
            return None;
        }
        self.on_timeout()
    }

    /// Fire a timeout now: lose a life and discard the current piece.
    pub fn on_timeout(&mut self) -> Option<TimeoutOutcome> {
        if self.state != LoopState::Running {
            return None;
        }
        if self.multiplier > 1 {
            debug!(multiplier = self.multiplier, "reset multiplier");
            self.multiplier = 1;
        }

        self.lives = self.lives.saturating_sub(1);
        info!(lives = self.lives, "timeout, life lost");
        self.events.push(GameEvent::LifeLost { lives: self.lives });

        if self.lives == 0 {
            self.stop_game_loop();
            self.state = LoopState::GameOver;
            let record = ScoreRecord::new(self.player.clone(), self.score);
            info!(player = %record.name, score = record.score, "game over");
            self.events.push(GameEvent::GameOver(record.clone()));
            return Some(TimeoutOutcome::GameOver(record));
        }

        self.next_piece();
        self.restart_game_loop();
        Some(TimeoutOutcome::Continue {
            delay_ms: self.timer_delay(),
        })
    }

    /// Back to a fresh idle game on the same grid size, keeping the RNG stream
    pub fn reset(&mut self) {
        self.grid.clear();
        self.current = None;
        self.following = None;
        self.score = 0;
        self.level = 0;
        self.level_reached = 0;
        self.lives = self.starting_lives;
        self.multiplier = 1;
        self.state = LoopState::Idle;
        self.countdown_ms = None;
        self.events.clear();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, PieceKind};
    use std::collections::HashSet;

    fn started(seed: u32) -> GameState {
        let mut game = GameState::new(seed);
        game.start();
        game.take_events();
        game
    }

    fn clear_of(lines: u32, cells: u8) -> LineClear {
        LineClear {
            lines,
            cleared: (0..cells).map(|i| Coord::new(i % 5, i / 5)).collect(),
            rows: Vec::new(),
            cols: Vec::new(),
        }
    }

    #[test]
    fn test_new_game_state() {
        let game = GameState::new(1);
        assert_eq!(game.state(), LoopState::Idle);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.multiplier(), 1);
        assert_eq!(game.score(), 0);
        assert!(game.current_piece().is_none());
        assert!(game.countdown_remaining_ms().is_none());
    }

    #[test]
    fn test_start_primes_pieces_and_arms_countdown() {
        let mut game = GameState::new(5);
        game.start();
        assert!(game.is_running());
        assert!(game.current_piece().is_some());
        assert!(game.following_piece().is_some());
        assert_eq!(game.countdown_remaining_ms(), Some(12_000));

        let events = game.take_events();
        assert!(matches!(events[0], GameEvent::NextPiece { .. }));
        assert_eq!(events[1], GameEvent::LoopScheduled { delay_ms: 12_000 });

        // Second start does nothing
        game.start();
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn test_score_formula_uses_multiplier_before_increment() {
        let mut game = started(1);
        game.multiplier = 3;
        game.score_lines(clear_of(2, 16));
        assert_eq!(game.score(), 960);
        assert_eq!(game.multiplier(), 4);
    }

    #[test]
    fn test_non_clearing_score_resets_multiplier() {
        let mut game = started(1);
        game.multiplier = 7;
        game.score_lines(LineClear::default());
        assert_eq!(game.multiplier(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(
            game.take_events(),
            vec![GameEvent::LinesCleared(LineClear::default())]
        );
    }

    #[test]
    fn test_level_up_fires_once_per_threshold() {
        let mut game = started(1);
        game.score = 990;
        game.score_lines(clear_of(1, 5)); // +50 -> 1040
        assert_eq!(game.level(), 1);
        let events = game.take_events();
        assert!(events.contains(&GameEvent::LevelUp { from: 0, to: 1 }));

        game.score_lines(clear_of(1, 1)); // +20 -> still level 1
        assert!(!game
            .take_events()
            .iter()
            .any(|e| matches!(e, GameEvent::LevelUp { .. })));
    }

    #[test]
    fn test_level_jump_reports_whole_range() {
        let mut game = started(1);
        game.multiplier = 5;
        game.score = 2_000;
        game.score_lines(clear_of(5, 25)); // 5*25*10*5 = 6250 -> 8250
        assert_eq!(game.level(), 8);
        let ups: Vec<_> = game
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .collect();
        assert_eq!(ups, vec![GameEvent::LevelUp { from: 0, to: 8 }]);
    }

    #[test]
    fn test_timer_delay_follows_level() {
        let mut game = started(1);
        game.score = 2_500;
        game.update_level();
        assert_eq!(game.level(), 2);
        assert_eq!(game.timer_delay(), 11_000);
        game.level = 20;
        assert_eq!(game.timer_delay(), 2_500);
    }

    #[test]
    fn test_block_clicked_places_and_advances() {
        let mut game = started(3);
        game.current = Some(Piece::new(PieceKind::Dot));
        let following = game.following;

        let clear = game.block_clicked(2, 2).unwrap();
        assert!(clear.is_empty());
        assert_eq!(game.grid().get(2, 2), Some(PieceKind::Dot.color()));
        assert_eq!(game.current, following);

        let events = game.take_events();
        assert_eq!(events[0], GameEvent::LoopScheduled { delay_ms: 12_000 });
        assert_eq!(events[1], GameEvent::LinesCleared(LineClear::default()));
        assert!(matches!(events[2], GameEvent::NextPiece { .. }));
    }

    #[test]
    fn test_block_clicked_rejects_without_changes() {
        let mut game = started(3);
        game.current = Some(Piece::new(PieceKind::Plus));
        game.tick(1_000);
        let before = game.snapshot();

        let err = game.block_clicked(0, 0).unwrap_err();
        assert_eq!(err, CoreError::InvalidPlacement { x: 0, y: 0 });
        assert_eq!(game.snapshot(), before);
        assert_eq!(
            game.take_events(),
            vec![GameEvent::PlacementRejected { x: 0, y: 0 }]
        );
    }

    #[test]
    fn test_block_clicked_requires_running() {
        let mut game = GameState::new(1);
        assert_eq!(game.block_clicked(2, 2), Err(CoreError::NotRunning));
    }

    #[test]
    fn test_placement_clearing_a_row_scores() {
        let mut game = started(3);
        for x in 0..4 {
            game.grid.set(x, 4, 1);
        }
        game.current = Some(Piece::new(PieceKind::Dot));
        let clear = game.block_clicked(4, 4).unwrap();
        assert_eq!(clear.lines, 1);
        let expected: HashSet<Coord> = (0..5).map(|x| Coord::new(x, 4)).collect();
        assert_eq!(clear.cleared, expected);
        assert_eq!(game.score(), 50);
        assert_eq!(game.multiplier(), 2);
        assert_eq!(game.grid().filled_count(), 0);
    }

    #[test]
    fn test_swap_and_rotate() {
        let mut game = started(8);
        let current = game.current.unwrap();
        let following = game.following.unwrap();
        assert!(game.swap_current_piece());
        assert_eq!(game.current, Some(following));
        assert_eq!(game.following, Some(current));

        game.current = Some(Piece::new(PieceKind::Line));
        assert!(game.rotate_current_piece());
        assert_eq!(game.current.unwrap().pattern()[0], [false, true, false]);
        assert!(game.reversed_rotate_current_piece());
        assert_eq!(*game.current.unwrap().pattern(), *Piece::new(PieceKind::Line).pattern());
        assert_eq!(game.current.unwrap().kind(), PieceKind::Line);
    }

    #[test]
    fn test_swap_without_pieces_is_noop() {
        let mut game = GameState::new(1);
        assert!(!game.swap_current_piece());
        assert!(!game.rotate_current_piece());
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn test_tick_counts_down_then_times_out() {
        let mut game = started(2);
        assert_eq!(game.tick(11_999), None);
        assert_eq!(game.countdown_remaining_ms(), Some(1));
        let outcome = game.tick(1);
        assert_eq!(outcome, Some(TimeoutOutcome::Continue { delay_ms: 12_000 }));
        assert_eq!(game.lives(), 2);
        assert_eq!(game.countdown_remaining_ms(), Some(12_000));
    }

    #[test]
    fn test_timeout_discards_current_and_resets_multiplier() {
        let mut game = started(2);
        game.multiplier = 4;
        let following = game.following;
        game.on_timeout();
        assert_eq!(game.multiplier(), 1);
        assert_eq!(game.current, following);
        let events = game.take_events();
        assert_eq!(events[0], GameEvent::LifeLost { lives: 2 });
        assert!(matches!(events[1], GameEvent::NextPiece { .. }));
        assert_eq!(events[2], GameEvent::LoopScheduled { delay_ms: 12_000 });
    }

    #[test]
    fn test_zero_sized_grid_is_rejected() {
        let err = GameState::with_config(GameConfig {
            cols: 0,
            ..GameConfig::default()
        })
        .unwrap_err();
        assert_eq!(err, CoreError::InvalidDimensions { cols: 0, rows: 5 });
        assert_eq!(err.code(), "invalid_dimensions");

        let game = GameState::with_config(GameConfig {
            cols: 7,
            rows: 3,
            ..GameConfig::default()
        })
        .unwrap();
        assert_eq!((game.grid().cols(), game.grid().rows()), (7, 3));
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut game = GameState::with_config(GameConfig {
            lives: 1,
            player: "Karso".to_string(),
            ..GameConfig::default()
        })
        .unwrap();
        game.start();
        game.score = 120;
        let outcome = game.on_timeout();
        let record = ScoreRecord::new("Karso", 120);
        assert_eq!(outcome, Some(TimeoutOutcome::GameOver(record.clone())));
        assert_eq!(game.lives(), 0);
        assert_eq!(game.state(), LoopState::GameOver);
        assert_eq!(game.countdown_remaining_ms(), None);
        assert!(game.take_events().contains(&GameEvent::GameOver(record)));

        assert_eq!(game.tick(60_000), None);
        assert_eq!(game.on_timeout(), None);
        game.restart_game_loop();
        assert_eq!(game.countdown_remaining_ms(), None);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut game = started(1);
        game.stop();
        assert_eq!(game.state(), LoopState::Stopped);
        assert_eq!(game.take_events(), vec![GameEvent::Stopped]);
        game.stop();
        game.stop_game_loop();
        assert!(game.take_events().is_empty());
        assert_eq!(game.tick(20_000), None);
    }

    #[test]
    fn test_stop_game_loop_keeps_playing_state() {
        let mut game = started(1);
        game.stop_game_loop();
        assert!(game.is_running());
        assert_eq!(game.tick(50_000), None);
        game.restart_game_loop();
        assert_eq!(game.countdown_remaining_ms(), Some(12_000));
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut game = started(1);
        game.grid.set(0, 0, 3);
        game.score = 400;
        game.on_timeout();
        game.reset();
        assert_eq!(game.state(), LoopState::Idle);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.score(), 0);
        assert_eq!(game.grid().filled_count(), 0);
        game.start();
        assert!(game.is_running());
    }
}
