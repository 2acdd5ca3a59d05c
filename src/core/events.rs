//! Record change events for real-time listeners
//!
//! Handlers publish a [`RecordEvent`] after every successful mutation; the
//! websocket feed forwards them to connected clients.
//!
//! ```text
//! REST Handler ──▶ EventBus::publish() ──▶ broadcast channel ──▶ /ws subscribers
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// A mutation of a customer or transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RecordEvent {
    Created {
        entity_type: String,
        entity_id: Uuid,
        data: serde_json::Value,
    },
    Updated {
        entity_type: String,
        entity_id: Uuid,
        data: serde_json::Value,
    },
    Deleted {
        entity_type: String,
        entity_id: Uuid,
    },
}

impl RecordEvent {
    pub fn entity_type(&self) -> &str {
        match self {
            RecordEvent::Created { entity_type, .. }
            | RecordEvent::Updated { entity_type, .. }
            | RecordEvent::Deleted { entity_type, .. } => entity_type,
        }
    }

    pub fn entity_id(&self) -> Uuid {
        match self {
            RecordEvent::Created { entity_id, .. }
            | RecordEvent::Updated { entity_id, .. }
            | RecordEvent::Deleted { entity_id, .. } => *entity_id,
        }
    }

    /// Get the action name (created, updated, deleted)
    pub fn action(&self) -> &str {
        match self {
            RecordEvent::Created { .. } => "created",
            RecordEvent::Updated { .. } => "updated",
            RecordEvent::Deleted { .. } => "deleted",
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: RecordEvent,
}

impl EventEnvelope {
    pub fn new(event: RecordEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; all clones publish into the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus; `capacity` is how many events a slow
    /// subscriber may fall behind before it starts skipping
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails: with no subscribers the event is dropped.
    pub fn publish(&self, event: RecordEvent) -> usize {
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
