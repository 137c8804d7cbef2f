//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the battle or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use tactics_core::{BattleEngine, Tick};

use super::errors::{Result, RuntimeError};
use super::intent::PlayerIntent;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Place both active characters and open turn 1.
    pub async fn start(&self) -> Result<()> {
        self.request(|reply| Command::Start { reply }).await?
    }

    /// Apply a player intent. Rejections come back as [`RuntimeError::Rejected`]
    /// and leave the battle untouched.
    pub async fn act(&self, intent: PlayerIntent) -> Result<()> {
        self.request(|reply| Command::Act { intent, reply }).await?
    }

    /// Advance engine time by `dt`; returns the engine clock afterwards.
    pub async fn advance(&self, dt: Tick) -> Result<Tick> {
        self.request(|reply| Command::Advance { dt, reply }).await
    }

    /// Resolve pending suspensions, consuming at most `limit` ticks.
    pub async fn run_until_idle(&self, limit: Tick) -> Result<Tick> {
        self.request(|reply| Command::RunUntilIdle { limit, reply })
            .await
    }

    /// Query the current battle (read-only snapshot)
    pub async fn snapshot(&self) -> Result<BattleEngine> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Reset the battle and bootstrap it again. `seed` replaces the engine
    /// seed first when given.
    pub async fn restart(&self, seed: Option<u64>) -> Result<()> {
        self.request(|reply| Command::Restart { seed, reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - Engine notifications
    /// - `Topic::Turn` - Turn hand-offs
    /// - `Topic::Runtime` - Rejections, restarts and completion
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tactics_runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Handle turn events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
