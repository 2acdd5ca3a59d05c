//! WebSocket upgrade handler and message loop
//!
//! Each connection gets:
//!
//! 1. A welcome message with its unique connection ID
//! 2. A forward task turning matching bus events into `event` messages
//! 3. A write task draining the outgoing queue into the socket
//! 4. A read loop answering pings

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::stream::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use uuid::Uuid;

use super::protocol::{ClientMessage, FeedFilter, ServerMessage};
use crate::core::EventBus;
use crate::server::state::AppState;

/// Outgoing messages buffered per connection
const OUTBOX_CAPACITY: usize = 64;

/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(filter): Query<FeedFilter>,
) -> impl IntoResponse {
    let events = state.events.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, events, filter))
}

async fn handle_socket(socket: WebSocket, events: EventBus, filter: FeedFilter) {
    let connection_id = Uuid::new_v4().to_string();
    let (mut ws_write, mut ws_read) = socket.split();
    let (outbox, mut outbox_rx) = mpsc::channel::<ServerMessage>(OUTBOX_CAPACITY);

    tracing::debug!(connection_id = %connection_id, "websocket connected");

    // Subscribe before the welcome so no event published after it is missed
    let mut feed = BroadcastStream::new(events.subscribe());

    let welcome = ServerMessage::Welcome {
        connection_id: connection_id.clone(),
    };
    if let Ok(json) = serde_json::to_string(&welcome)
        && ws_write.send(Message::Text(json.into())).await.is_err()
    {
        return;
    }

    let forward_outbox = outbox.clone();
    let forward_id = connection_id.clone();
    let forward_handle = tokio::spawn(async move {
        while let Some(item) = feed.next().await {
            match item {
                Ok(envelope) => {
                    if !filter.matches(&envelope.event) {
                        continue;
                    }
                    if forward_outbox
                        .send(ServerMessage::Event { data: envelope })
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        connection_id = %forward_id,
                        skipped,
                        "websocket client lagging, events skipped"
                    );
                }
            }
        }
    });

    let write_id = connection_id.clone();
    let write_handle = tokio::spawn(async move {
        while let Some(msg) = outbox_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_write.send(Message::Text(json.into())).await.is_err() {
                        tracing::debug!(connection_id = %write_id, "websocket write failed, closing");
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        connection_id = %write_id,
                        error = %e,
                        "failed to serialize websocket message"
                    );
                }
            }
        }
    });

    while let Some(result) = ws_read.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let reply = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Ping) => ServerMessage::Pong,
                    Err(e) => ServerMessage::Error {
                        message: format!("Invalid message: {}", e),
                    },
                };
                if outbox.send(reply).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            // axum answers pings; binary frames are ignored
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "websocket read error");
                break;
            }
        }
    }

    forward_handle.abort();
    write_handle.abort();
    tracing::debug!(connection_id = %connection_id, "websocket disconnected");
}
