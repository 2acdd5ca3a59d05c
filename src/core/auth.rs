//! Authentication contracts
//!
//! Identity management is delegated to an [`IdentityProvider`]; the service
//! only keeps the [`AuthContext`] of the current request and checks it
//! against an [`AuthPolicy`] in the route guard.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::AuthError;

/// Authenticated user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Session handed to clients after sign-in or sign-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token to send in the `Authorization` header
    pub token: String,
    pub user: UserProfile,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Authorization context extracted from a request
#[derive(Debug, Clone)]
pub enum AuthContext {
    /// Request carries a valid session
    User { session: Session },

    /// No authentication (guard disabled)
    Anonymous,
}

impl AuthContext {
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            AuthContext::User { session } => Some(&session.user),
            AuthContext::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            AuthContext::User { session } => Some(&session.token),
            AuthContext::Anonymous => None,
        }
    }
}

/// Authorization policy for a group of routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Public access (no auth required)
    Public,

    /// Any signed-in user
    Authenticated,
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,
            AuthPolicy::Authenticated => !matches!(context, AuthContext::Anonymous),
        }
    }
}

/// Contract of the external identity provider
///
/// Every call is a thin pass-through to the provider; no retries.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError>;

    /// Email/password sign-in
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Federated sign-in with a token issued by `provider` (e.g. "google.com")
    async fn sign_in_federated(&self, provider: &str, id_token: &str)
    -> Result<Session, AuthError>;

    /// End the session identified by `token`
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    /// Resolve a bearer token into its session
    async fn verify(&self, token: &str) -> Result<Session, AuthError>;

    /// Change the display name of the signed-in user
    async fn update_profile(&self, token: &str, display_name: &str)
    -> Result<UserProfile, AuthError>;
}
