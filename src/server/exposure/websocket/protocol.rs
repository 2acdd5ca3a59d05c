//! WebSocket message protocol definitions
//!
//! ## Client → Server Messages
//!
//! ```json
//! {"type": "ping"}
//! ```
//!
//! ## Server → Client Messages
//!
//! ```json
//! {"type": "welcome", "connection_id": "..."}
//! {"type": "event", "data": {"id": "...", "timestamp": "...", "event": {"action": "created", ...}}}
//! {"type": "pong"}
//! {"type": "error", "message": "..."}
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::events::{EventEnvelope, RecordEvent};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Keepalive ping
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once on connection
    Welcome { connection_id: String },

    /// A record changed
    Event { data: EventEnvelope },

    /// Keepalive response
    Pong,

    Error { message: String },
}

/// Feed filter, taken from the upgrade request's query string
///
/// Unset fields match everything, e.g. `/ws?entity_type=customer` only
/// forwards customer changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedFilter {
    #[serde(default)]
    pub entity_type: Option<String>,

    #[serde(default)]
    pub entity_id: Option<Uuid>,

    /// `created`, `updated` or `deleted`
    #[serde(default)]
    pub action: Option<String>,
}

impl FeedFilter {
    pub fn matches(&self, event: &RecordEvent) -> bool {
        self.entity_type
            .as_deref()
            .is_none_or(|t| t == event.entity_type())
            && self.entity_id.is_none_or(|id| id == event.entity_id())
            && self.action.as_deref().is_none_or(|a| a == event.action())
    }
}
