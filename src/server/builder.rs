//! ServerBuilder for fluent API to build the HTTP server

use super::exposure::{RestExposure, WebSocketExposure};
use super::state::AppState;
use crate::config::KycConfig;
use crate::core::events::EventBus;
use crate::core::{DataService, IdentityProvider};
use crate::domain::{Customer, DisplayFormat, Transaction};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the KYC HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_customer_service(InMemoryDataService::<Customer>::new())
///     .with_transaction_service(InMemoryDataService::<Transaction>::new())
///     .with_identity_provider(InMemoryIdentityProvider::default())
///     .build()?;
/// ```
pub struct ServerBuilder {
    customers: Option<Arc<dyn DataService<Customer>>>,
    transactions: Option<Arc<dyn DataService<Transaction>>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    custom_routes: Vec<Router<AppState>>,
    event_bus: Option<EventBus>,
    format: DisplayFormat,
    auth_required: bool,
    recent_limit: usize,
    cors_permissive: bool,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            customers: None,
            transactions: None,
            identity: None,
            custom_routes: Vec::new(),
            event_bus: None,
            format: DisplayFormat::default(),
            auth_required: true,
            recent_limit: 5,
            cors_permissive: false,
        }
    }

    /// Apply the server, auth, dashboard and display sections of a config
    ///
    /// Stores and the identity provider still have to be supplied.
    pub fn from_config(config: &KycConfig) -> Self {
        Self::new()
            .with_event_bus(config.server.event_capacity)
            .with_permissive_cors(config.server.cors_permissive)
            .with_auth_required(config.auth.required)
            .with_recent_limit(config.dashboard.recent_limit)
            .with_display_format(DisplayFormat::new(config.display.utc_offset_minutes))
    }

    /// Set the customer store (required)
    pub fn with_customer_service(mut self, service: impl DataService<Customer> + 'static) -> Self {
        self.customers = Some(Arc::new(service));
        self
    }

    /// Set the transaction store (required)
    pub fn with_transaction_service(
        mut self,
        service: impl DataService<Transaction> + 'static,
    ) -> Self {
        self.transactions = Some(Arc::new(service));
        self
    }

    /// Set the identity provider (required)
    pub fn with_identity_provider(mut self, provider: impl IdentityProvider + 'static) -> Self {
        self.identity = Some(Arc::new(provider));
        self
    }

    /// Same as [`with_identity_provider`](Self::with_identity_provider) for an
    /// already shared provider
    pub fn with_shared_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(provider);
        self
    }

    /// Add routes that run behind the route guard and share the app state
    pub fn with_custom_routes(mut self, routes: Router<AppState>) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Use a dedicated event bus with the given capacity
    ///
    /// Without this call a bus with the default capacity is created.
    pub fn with_event_bus(mut self, capacity: usize) -> Self {
        self.event_bus = Some(EventBus::new(capacity));
        self
    }

    pub fn with_display_format(mut self, format: DisplayFormat) -> Self {
        self.format = format;
        self
    }

    /// Disable the route guard for local development
    pub fn with_auth_required(mut self, required: bool) -> Self {
        self.auth_required = required;
        self
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub fn with_permissive_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Assemble the shared handler state
    pub fn build_state(&mut self) -> Result<AppState> {
        let customers = self.customers.take().ok_or_else(|| {
            anyhow::anyhow!("Customer store is required. Call .with_customer_service()")
        })?;
        let transactions = self.transactions.take().ok_or_else(|| {
            anyhow::anyhow!("Transaction store is required. Call .with_transaction_service()")
        })?;
        let identity = self.identity.take().ok_or_else(|| {
            anyhow::anyhow!("Identity provider is required. Call .with_identity_provider()")
        })?;

        Ok(AppState {
            customers,
            transactions,
            identity,
            events: self.event_bus.take().unwrap_or_default(),
            format: self.format,
            auth_required: self.auth_required,
            recent_limit: self.recent_limit,
        })
    }

    /// Build the final router: REST + websocket feed, traced, with CORS
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);

        if !state.auth_required {
            tracing::warn!("route guard disabled, requests run anonymously");
        }

        let mut app = RestExposure::build_router(state.clone(), custom_routes)
            .merge(WebSocketExposure::build_router(state))
            .layer(TraceLayer::new_for_http());

        if self.cors_permissive {
            app = app.layer(CorsLayer::permissive());
        }

        Ok(app)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
