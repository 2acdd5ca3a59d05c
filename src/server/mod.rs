//! HTTP server: builder, shared state, route guard, handlers and exposures

pub mod builder;
pub mod exposure;
pub mod guard;
pub mod handlers;
pub mod state;

pub use builder::ServerBuilder;
pub use exposure::{RestExposure, WebSocketExposure};
pub use state::AppState;
