//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use tactics_core::Notification;

use super::types::{RuntimeEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Engine notifications (damage, movement, cards, messages)
    Battle,
    /// Turn hand-offs
    Turn,
    /// Session lifecycle (rejections, restarts, completion)
    Runtime,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Battle, Topic::Turn, Topic::Runtime];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Notification(Notification),
    Turn(TurnEvent),
    Runtime(RuntimeEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Notification(_) => Topic::Battle,
            Event::Turn(_) => Topic::Turn,
            Event::Runtime(_) => Topic::Runtime,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<Event>>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels: HashMap<Topic, broadcast::Sender<Event>> = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        // Best-effort: a contended lock drops the event rather than blocking the worker.
        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic)
                    && tx.send(event).is_err()
                {
                    tracing::trace!(target: "tactics_runtime::events", ?topic, "no subscribers");
                }
            }
            Err(_) => {
                tracing::debug!(target: "tactics_runtime::events", ?topic, "event bus lock contended, event dropped");
            }
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    /// Subscribing never blocks: under write contention a detached receiver
    /// is handed out instead.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.try_read() {
            Ok(channels) => match channels.get(&topic) {
                Some(tx) => tx.subscribe(),
                None => broadcast::channel(1).1,
            },
            Err(_) => {
                tracing::warn!(target: "tactics_runtime::events", ?topic, "subscribe under contention");
                broadcast::channel(1).1
            }
        }
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
