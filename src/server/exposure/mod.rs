//! API exposure modules
//!
//! Each exposure consumes the [`AppState`](crate::server::AppState) and
//! produces a Router for its protocol.

pub mod rest;
pub mod websocket;

pub use rest::RestExposure;
pub use websocket::WebSocketExposure;
