//! WebSocket feed of record changes
//!
//! ```text
//! Client ──ws──▶ /ws?entity_type=… ──▶ ws_handler() ──▶ EventBus::subscribe()
//!                                                            │
//!                        REST handler ──publish──▶ broadcast ┴──▶ filter ──▶ Client
//! ```
//!
//! The upgrade request goes through the same route guard as the REST API;
//! browsers pass the token as `?access_token=`.

mod handler;
pub mod protocol;

use axum::routing::get;
use axum::{Router, middleware};

use crate::server::guard::require_session;
use crate::server::state::AppState;

pub use protocol::{ClientMessage, FeedFilter, ServerMessage};

/// WebSocket API exposure implementation
pub struct WebSocketExposure;

impl WebSocketExposure {
    /// Build the router with the guarded `/ws` endpoint
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/ws", get(handler::ws_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
            .with_state(state)
    }
}
