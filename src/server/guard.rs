//! Route guard
//!
//! Resolves the bearer token of each request into an [`AuthContext`] and
//! stores it in the request extensions for handlers to pick up.

use axum::extract::{Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use serde::Deserialize;

use crate::core::auth::{AuthContext, AuthPolicy};
use crate::core::error::{AuthError, KycError};
use crate::server::state::AppState;

/// Query parameter accepted in place of the header (browser websockets
/// cannot set `Authorization`)
#[derive(Debug, Deserialize)]
struct TokenParams {
    access_token: Option<String>,
}

/// Extract the bearer token from the `Authorization` header or the
/// `access_token` query parameter
pub fn bearer_token(req: &Request) -> Option<String> {
    let from_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        Query::<TokenParams>::try_from_uri(req.uri())
            .ok()
            .and_then(|Query(params)| params.access_token)
            .filter(|token| !token.is_empty())
    })
}

/// Middleware for every guarded route
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, KycError> {
    let policy = if state.auth_required {
        AuthPolicy::Authenticated
    } else {
        AuthPolicy::Public
    };

    let context = match bearer_token(&req) {
        Some(token) => match state.identity.verify(&token).await {
            Ok(session) => AuthContext::User { session },
            Err(e) if policy == AuthPolicy::Authenticated => {
                tracing::warn!(path = %req.uri().path(), error = %e, "rejected session");
                return Err(e.into());
            }
            Err(_) => AuthContext::Anonymous,
        },
        None => AuthContext::Anonymous,
    };

    if !policy.check(&context) {
        tracing::warn!(path = %req.uri().path(), "missing bearer token");
        return Err(AuthError::unauthorized("sign in required").into());
    }

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryIdentityProvider;
    use crate::core::IdentityProvider;
    use crate::domain::{Customer, Transaction};
    use crate::server::ServerBuilder;
    use crate::storage::InMemoryDataService;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Extension, Router, middleware};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn whoami(Extension(context): Extension<AuthContext>) -> String {
        context
            .user()
            .map(|u| u.email.clone())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(identity: Arc<dyn IdentityProvider>, auth_required: bool) -> Router {
        let state = ServerBuilder::new()
            .with_customer_service(InMemoryDataService::<Customer>::new())
            .with_transaction_service(InMemoryDataService::<Transaction>::new())
            .with_shared_identity_provider(identity)
            .with_auth_required(auth_required)
            .build_state()
            .unwrap();

        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
            .with_state(state)
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_bearer_token_sources() {
        let req = Request::builder()
            .uri("/ws?entity_type=customer&access_token=abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc"));

        let req = Request::builder()
            .uri("/customers?access_token=query")
            .header(AUTHORIZATION, "Bearer header")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req).as_deref(), Some("header"));

        let req = Request::builder()
            .uri("/customers")
            .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        assert!(bearer_token(&req).is_none());
    }

    #[test]
    fn test_query_token_is_percent_decoded() {
        let req = Request::builder()
            .uri("/ws?access_token=a%2Bb%2F%3D&entity_type=customer")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req).as_deref(), Some("a+b/="));

        let req = Request::builder()
            .uri("/ws?access_token=")
            .body(Body::empty())
            .unwrap();
        assert!(bearer_token(&req).is_none());
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let identity: Arc<dyn IdentityProvider> = Arc::new(InMemoryIdentityProvider::default());
        let response = app(identity, true)
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let identity: Arc<dyn IdentityProvider> = Arc::new(InMemoryIdentityProvider::default());
        let session = identity
            .sign_up("staff@bank.co.id", "rahasia123", "Staff")
            .await
            .unwrap();

        let response = app(identity, true)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {}", session.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "staff@bank.co.id");
    }

    #[tokio::test]
    async fn test_relaxed_guard_runs_anonymously() {
        let identity: Arc<dyn IdentityProvider> = Arc::new(InMemoryIdentityProvider::default());
        let response = app(identity, false)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, "Bearer stale")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
    }
}
