//! Session actor.
//!
//! One tokio task owns the [`GameState`]. Player requests arrive on an mpsc
//! queue; the countdown is the task's own `sleep`. Both are handled by the same
//! task, one at a time, so a placement and a timeout never interleave, and a
//! countdown restarted by a placement can never fire its stale deadline.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tetrecs_core::{GameSnapshot, GameState, LineClear, LoopState, TimeoutOutcome};
use tetrecs_types::{Command, ScoreRecord};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::event::SessionEvent;
use crate::scores::ScoreSink;

/// Request delivered to the session task.
#[derive(Debug)]
enum Request {
    Place {
        x: i32,
        y: i32,
        reply: oneshot::Sender<Result<LineClear, SessionError>>,
    },
    Rotate {
        clockwise: bool,
        reply: oneshot::Sender<bool>,
    },
    Swap {
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
}

/// Reply to a [`Command`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Placed(LineClear),
    Rotated(bool),
    Swapped(bool),
    Stopped,
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub state: LoopState,
    pub record: ScoreRecord,
    pub snapshot: GameSnapshot,
}

/// Cloneable handle for talking to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Request>,
    events: broadcast::Sender<SessionEvent>,
    cancel: CancellationToken,
    /// Cancelled by the task itself once it has published its last event
    done: CancellationToken,
}

impl SessionHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Request,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Place the current piece centered on `(x, y)`
    pub async fn place(&self, x: i32, y: i32) -> Result<LineClear, SessionError> {
        self.request(|reply| Request::Place { x, y, reply })
            .await?
    }

    pub async fn rotate(&self) -> Result<bool, SessionError> {
        self.request(|reply| Request::Rotate {
            clockwise: true,
            reply,
        })
        .await
    }

    pub async fn rotate_reversed(&self) -> Result<bool, SessionError> {
        self.request(|reply| Request::Rotate {
            clockwise: false,
            reply,
        })
        .await
    }

    pub async fn swap(&self) -> Result<bool, SessionError> {
        self.request(|reply| Request::Swap { reply }).await
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot, SessionError> {
        self.request(|reply| Request::Snapshot { reply }).await
    }

    /// Dispatch a player command
    pub async fn apply(&self, command: Command) -> Result<CommandReply, SessionError> {
        match command {
            Command::Place { x, y } => self.place(x, y).await.map(CommandReply::Placed),
            Command::Rotate => self.rotate().await.map(CommandReply::Rotated),
            Command::RotateReversed => self.rotate_reversed().await.map(CommandReply::Rotated),
            Command::Swap => self.swap().await.map(CommandReply::Swapped),
            Command::Stop => {
                self.stop();
                Ok(CommandReply::Stopped)
            }
        }
    }

    /// End the session. Idempotent; only this session is affected.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Resolves once the session task has ended and published its last event
    pub async fn finished(&self) {
        self.done.cancelled().await
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.done.is_cancelled()
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

/// A spawned session: the handle plus the task that owns the game
#[derive(Debug)]
pub struct Session {
    handle: SessionHandle,
    task: JoinHandle<SessionOutcome>,
}

impl Session {
    /// Spawn the session task on the current tokio runtime and start the game.
    ///
    /// Fails with [`SessionError::Rejected`] when the grid dimensions are zero.
    pub fn spawn(
        config: SessionConfig,
        sink: Option<Box<dyn ScoreSink>>,
    ) -> Result<Self, SessionError> {
        Self::spawn_subscribed(config, sink).map(|(session, _)| session)
    }

    /// Like [`Session::spawn`], subscribing before the game starts so the
    /// first events are not missed.
    pub fn spawn_subscribed(
        config: SessionConfig,
        sink: Option<Box<dyn ScoreSink>>,
    ) -> Result<(Self, broadcast::Receiver<SessionEvent>), SessionError> {
        let game = GameState::with_config(config.game)?;

        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let (events, events_rx) = broadcast::channel(config.event_capacity.max(1));
        let cancel = CancellationToken::new();
        let done = CancellationToken::new();

        let task = tokio::spawn(run(
            game,
            rx,
            events.clone(),
            cancel.clone(),
            done.clone(),
            sink,
        ));

        Ok((
            Self {
                handle: SessionHandle {
                    tx,
                    events,
                    cancel,
                    done,
                },
                task,
            },
            events_rx,
        ))
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    /// Wait for the session to end
    pub async fn wait(self) -> anyhow::Result<SessionOutcome> {
        Ok(self.task.await?)
    }
}

fn publish(game: &mut GameState, events: &broadcast::Sender<SessionEvent>) {
    for event in game.take_events() {
        // No subscribers is fine.
        let _ = events.send(SessionEvent::from(event));
    }
}

/// Feed the whole milliseconds since `last_tick` to the game.
///
/// `last_tick` moves forward by exactly the time consumed, so the sub-millisecond
/// remainder carries into the next call instead of being dropped.
fn advance_clock(game: &mut GameState, last_tick: &mut Instant) -> Option<TimeoutOutcome> {
    let elapsed = u32::try_from(last_tick.elapsed().as_millis()).unwrap_or(u32::MAX);
    *last_tick += Duration::from_millis(elapsed as u64);
    game.tick(elapsed)
}

fn handle_request(game: &mut GameState, request: Request) {
    match request {
        Request::Place { x, y, reply } => {
            debug!(x, y, "place request");
            let _ = reply.send(game.block_clicked(x, y).map_err(SessionError::from));
        }
        Request::Rotate { clockwise, reply } => {
            let rotated = if clockwise {
                game.rotate_current_piece()
            } else {
                game.reversed_rotate_current_piece()
            };
            let _ = reply.send(rotated);
        }
        Request::Swap { reply } => {
            let _ = reply.send(game.swap_current_piece());
        }
        Request::Snapshot { reply } => {
            let _ = reply.send(game.snapshot());
        }
    }
}

fn submit_score(sink: &mut Option<Box<dyn ScoreSink>>, record: &ScoreRecord) {
    let Some(sink) = sink.as_mut() else {
        return;
    };
    if let Err(e) = sink.submit(record) {
        warn!(error = %e, player = %record.name, score = record.score, "failed to submit score");
    }
}

async fn run(
    mut game: GameState,
    mut rx: mpsc::Receiver<Request>,
    events: broadcast::Sender<SessionEvent>,
    cancel: CancellationToken,
    done: CancellationToken,
    mut sink: Option<Box<dyn ScoreSink>>,
) -> SessionOutcome {
    game.start();
    publish(&mut game, &events);
    info!(seed = game.seed(), "session started");

    let mut last_tick = Instant::now();

    loop {
        let outcome = advance_clock(&mut game, &mut last_tick);
        publish(&mut game, &events);

        if let Some(TimeoutOutcome::GameOver(record)) = outcome {
            submit_score(&mut sink, &record);
            break;
        }

        // Absolute deadline: requests arriving in between do not push it back.
        let deadline = game
            .countdown_remaining_ms()
            .map(|ms| last_tick + Duration::from_millis(ms as u64));

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                game.stop();
                publish(&mut game, &events);
                break;
            }

            request = rx.recv() => match request {
                Some(request) => {
                    // Apply any timeout that came due while the request was queued.
                    let outcome = advance_clock(&mut game, &mut last_tick);
                    if let Some(TimeoutOutcome::GameOver(record)) = outcome {
                        publish(&mut game, &events);
                        submit_score(&mut sink, &record);
                        break;
                    }
                    handle_request(&mut game, request);
                    publish(&mut game, &events);
                }
                None => {
                    debug!("all session handles dropped");
                    game.stop();
                    publish(&mut game, &events);
                    break;
                }
            },

            _ = sleep_until(deadline.unwrap_or(last_tick)), if deadline.is_some() => {}
        }
    }

    // Later requests see a closed channel, and handles see the session as finished.
    rx.close();
    done.cancel();
    let record = ScoreRecord::new(game.player(), game.score());
    info!(state = ?game.state(), score = record.score, "session ended");
    SessionOutcome {
        state: game.state(),
        record,
        snapshot: game.snapshot(),
    }
}
