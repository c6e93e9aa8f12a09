//! Blocking runtime integration.
//!
//! Bridges a synchronous caller (a UI thread, a CLI loop) with the async
//! session actor.

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::broadcast;

use tetrecs_core::{GameSnapshot, LineClear};
use tetrecs_types::Command;

use crate::actor::{CommandReply, Session, SessionHandle, SessionOutcome};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::event::SessionEvent;
use crate::scores::ScoreSink;

/// A session plus the runtime it runs on
pub struct SessionRuntime {
    rt: Runtime,
    session: Session,
    events: broadcast::Receiver<SessionEvent>,
}

impl SessionRuntime {
    /// Start a session on a fresh multi-threaded runtime.
    pub fn start(config: SessionConfig, sink: Option<Box<dyn ScoreSink>>) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let (session, events) = {
            let _guard = rt.enter();
            Session::spawn_subscribed(config, sink).context("invalid session config")?
        };
        Ok(Self {
            rt,
            session,
            events,
        })
    }

    pub fn handle(&self) -> &SessionHandle {
        self.session.handle()
    }

    pub fn place(&self, x: i32, y: i32) -> Result<LineClear, SessionError> {
        self.rt.block_on(self.handle().place(x, y))
    }

    pub fn rotate(&self) -> Result<bool, SessionError> {
        self.rt.block_on(self.handle().rotate())
    }

    pub fn rotate_reversed(&self) -> Result<bool, SessionError> {
        self.rt.block_on(self.handle().rotate_reversed())
    }

    pub fn swap(&self) -> Result<bool, SessionError> {
        self.rt.block_on(self.handle().swap())
    }

    pub fn snapshot(&self) -> Result<GameSnapshot, SessionError> {
        self.rt.block_on(self.handle().snapshot())
    }

    pub fn apply(&self, command: Command) -> Result<CommandReply, SessionError> {
        self.rt.block_on(self.handle().apply(command))
    }

    pub fn stop(&self) {
        self.handle().stop();
    }

    /// Events published since the last call, without waiting.
    ///
    /// Events dropped because this receiver fell behind are skipped.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => out.push(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "event receiver lagged");
                }
                Err(_) => break,
            }
        }
        out
    }

    /// Block until the next event arrives.
    ///
    /// Returns `None` once the session has ended and every event was read.
    pub fn next_event(&mut self) -> Option<SessionEvent> {
        let Self {
            rt,
            session,
            events,
        } = self;
        let handle = session.handle();
        rt.block_on(async {
            loop {
                tokio::select! {
                    biased;

                    received = events.recv() => match received {
                        Ok(event) => return Some(event),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "event receiver lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    },

                    _ = handle.finished() => {
                        // Everything the task published is already buffered.
                        return loop {
                            match events.try_recv() {
                                Ok(event) => break Some(event),
                                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                                Err(_) => break None,
                            }
                        };
                    }
                }
            }
        })
    }

    /// Block until the session ends
    pub fn wait(self) -> Result<SessionOutcome> {
        let Self { rt, session, .. } = self;
        rt.block_on(session.wait())
    }
}
