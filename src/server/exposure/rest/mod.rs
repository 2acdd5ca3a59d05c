//! REST API exposure
//!
//! Consumes the [`AppState`] and produces the Axum `Router` with every JSON
//! endpoint. Guarded routes run behind [`require_session`].

use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde_json::{Value, json};

use crate::server::guard::require_session;
use crate::server::handlers::{auth, customers, dashboard, transactions};
use crate::server::state::AppState;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// Returns a router with:
    /// - Health check routes (public)
    /// - Sign-in / sign-up routes (public)
    /// - Customer, transaction, dashboard and profile routes (guarded)
    /// - Custom routes, guarded as well
    pub fn build_router(state: AppState, custom_routes: Vec<Router<AppState>>) -> Router {
        let mut guarded = Router::new()
            .route(
                "/customers",
                get(customers::list_customers).post(customers::create_customer),
            )
            .route(
                "/customers/{id}",
                get(customers::get_customer)
                    .put(customers::update_customer)
                    .delete(customers::delete_customer),
            )
            .route(
                "/transactions",
                get(transactions::list_transactions).post(transactions::create_transaction),
            )
            .route(
                "/transactions/{id}",
                get(transactions::get_transaction)
                    .put(transactions::update_transaction)
                    .delete(transactions::delete_transaction),
            )
            .route("/dashboard", get(dashboard::dashboard))
            .route("/auth/logout", post(auth::logout))
            .route("/auth/me", get(auth::me).put(auth::update_me));

        for custom in custom_routes {
            guarded = guarded.merge(custom);
        }

        let guarded =
            guarded.route_layer(middleware::from_fn_with_state(state.clone(), require_session));

        let public = Router::new()
            .route("/auth/register", post(auth::register))
            .route("/auth/login", post(auth::login))
            .route("/auth/federated", post(auth::federated));

        Self::health_routes()
            .merge(public)
            .merge(guarded)
            .with_state(state)
    }

    fn health_routes() -> Router<AppState> {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "kyc-records"
        }))
    }
}
