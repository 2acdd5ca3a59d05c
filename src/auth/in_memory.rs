//! In-process identity provider for development and tests
//!
//! Accounts and sessions live in memory and vanish on restart. Passwords are
//! kept as salted SHA-256 digests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::core::auth::{IdentityProvider, Session, UserProfile};
use crate::core::error::AuthError;

/// Federated providers accepted by [`InMemoryIdentityProvider`]
pub const FEDERATED_PROVIDERS: [&str; 1] = ["google.com"];

#[derive(Debug, Clone)]
struct Account {
    profile: UserProfile,
    salt: String,
    digest: String,
}

#[derive(Default)]
struct State {
    /// Keyed by lower-cased email
    accounts: HashMap<String, Account>,
    /// Keyed by bearer token
    sessions: HashMap<String, Session>,
}

/// Identity provider keeping accounts and sessions in memory
#[derive(Clone)]
pub struct InMemoryIdentityProvider {
    state: Arc<RwLock<State>>,
    session_ttl: Duration,
}

impl InMemoryIdentityProvider {
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            session_ttl,
        }
    }

    fn lock_error(e: impl std::fmt::Display) -> AuthError {
        AuthError::Provider {
            message: format!("Failed to acquire identity store lock: {}", e),
        }
    }

    fn open_session(&self, state: &mut State, profile: UserProfile) -> Session {
        state.sessions.retain(|_, session| !session.is_expired());

        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user: profile,
            expires_at: Utc::now() + self.session_ttl,
        };
        state
            .sessions
            .insert(session.token.clone(), session.clone());
        session
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let key = email.to_lowercase();
        let mut state = self.state.write().map_err(Self::lock_error)?;

        if state.accounts.contains_key(&key) {
            return Err(AuthError::EmailTaken {
                email: email.to_string(),
            });
        }

        let salt = Uuid::new_v4().simple().to_string();
        let profile = UserProfile {
            user_id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
        };
        state.accounts.insert(
            key,
            Account {
                profile: profile.clone(),
                digest: digest(&salt, password),
                salt,
            },
        );

        Ok(self.open_session(&mut state, profile))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let mut state = self.state.write().map_err(Self::lock_error)?;

        let profile = match state.accounts.get(&email.to_lowercase()) {
            Some(account) if account.digest == digest(&account.salt, password) => {
                account.profile.clone()
            }
            _ => return Err(AuthError::InvalidCredentials),
        };

        Ok(self.open_session(&mut state, profile))
    }

    /// Accepts the subject of the federated token as the account identity;
    /// the first sign-in creates the account.
    async fn sign_in_federated(
        &self,
        provider: &str,
        id_token: &str,
    ) -> Result<Session, AuthError> {
        if !FEDERATED_PROVIDERS.contains(&provider) {
            return Err(AuthError::UnsupportedProvider {
                provider: provider.to_string(),
            });
        }
        let subject = id_token.trim();
        if subject.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let email = if subject.contains('@') {
            subject.to_string()
        } else {
            format!("{}@{}", subject, provider)
        };

        let mut state = self.state.write().map_err(Self::lock_error)?;
        let profile = state
            .accounts
            .entry(email.to_lowercase())
            .or_insert_with(|| Account {
                profile: UserProfile {
                    user_id: Uuid::new_v4().to_string(),
                    email: email.clone(),
                    display_name: None,
                },
                // Federated accounts cannot sign in with a password
                salt: Uuid::new_v4().simple().to_string(),
                digest: String::new(),
            })
            .profile
            .clone();

        Ok(self.open_session(&mut state, profile))
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let mut state = self.state.write().map_err(Self::lock_error)?;
        state.sessions.remove(token);
        Ok(())
    }

    async fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let mut state = self.state.write().map_err(Self::lock_error)?;

        match state.sessions.get(token) {
            Some(session) if !session.is_expired() => Ok(session.clone()),
            Some(_) => {
                state.sessions.remove(token);
                Err(AuthError::unauthorized("session expired"))
            }
            None => Err(AuthError::unauthorized("unknown session")),
        }
    }

    async fn update_profile(
        &self,
        token: &str,
        display_name: &str,
    ) -> Result<UserProfile, AuthError> {
        let session = self.verify(token).await?;
        let mut state = self.state.write().map_err(Self::lock_error)?;

        let account = state
            .accounts
            .get_mut(&session.user.email.to_lowercase())
            .ok_or_else(|| AuthError::unauthorized("account no longer exists"))?;
        account.profile.display_name = Some(display_name.to_string());
        let profile = account.profile.clone();

        for session in state.sessions.values_mut() {
            if session.user.user_id == profile.user_id {
                session.user = profile.clone();
            }
        }

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let provider = InMemoryIdentityProvider::default();
        let created = provider
            .sign_up("staff@example.com", "rahasia", "Staff")
            .await
            .unwrap();
        assert_eq!(created.user.display_name.as_deref(), Some("Staff"));

        let session = provider
            .sign_in("STAFF@example.com", "rahasia")
            .await
            .unwrap();
        assert_eq!(session.user.user_id, created.user.user_id);
        assert_ne!(session.token, created.token);
    }

    #[tokio::test]
    async fn test_wrong_password_and_duplicate_email() {
        let provider = InMemoryIdentityProvider::default();
        provider
            .sign_up("staff@example.com", "rahasia", "Staff")
            .await
            .unwrap();

        assert!(matches!(
            provider.sign_in("staff@example.com", "salah!").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            provider.sign_in("nobody@example.com", "rahasia").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            provider.sign_up("staff@example.com", "other1", "Other").await,
            Err(AuthError::EmailTaken { .. })
        ));
    }

    #[tokio::test]
    async fn test_sign_out_invalidates_token() {
        let provider = InMemoryIdentityProvider::default();
        let session = provider
            .sign_up("staff@example.com", "rahasia", "Staff")
            .await
            .unwrap();

        assert!(provider.verify(&session.token).await.is_ok());
        provider.sign_out(&session.token).await.unwrap();
        assert!(matches!(
            provider.verify(&session.token).await,
            Err(AuthError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let provider = InMemoryIdentityProvider::new(Duration::seconds(-1));
        let session = provider
            .sign_up("staff@example.com", "rahasia", "Staff")
            .await
            .unwrap();
        assert!(provider.verify(&session.token).await.is_err());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_pruned_on_sign_in() {
        let provider = InMemoryIdentityProvider::new(Duration::seconds(-1));
        provider
            .sign_up("staff@example.com", "rahasia", "Staff")
            .await
            .unwrap();
        for _ in 0..3 {
            provider.sign_in("staff@example.com", "rahasia").await.unwrap();
        }

        let state = provider.state.read().unwrap();
        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_federated_sign_in() {
        let provider = InMemoryIdentityProvider::default();
        let first = provider
            .sign_in_federated("google.com", "budi@gmail.com")
            .await
            .unwrap();
        let second = provider
            .sign_in_federated("google.com", "budi@gmail.com")
            .await
            .unwrap();
        assert_eq!(first.user.user_id, second.user.user_id);

        // No password was ever set for this account
        assert!(provider.sign_in("budi@gmail.com", "").await.is_err());

        assert!(matches!(
            provider.sign_in_federated("facebook.com", "x").await,
            Err(AuthError::UnsupportedProvider { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_profile_refreshes_sessions() {
        let provider = InMemoryIdentityProvider::default();
        let session = provider
            .sign_up("staff@example.com", "rahasia", "Staff")
            .await
            .unwrap();

        let profile = provider
            .update_profile(&session.token, "Kepala Cabang")
            .await
            .unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Kepala Cabang"));

        let verified = provider.verify(&session.token).await.unwrap();
        assert_eq!(verified.user.display_name.as_deref(), Some("Kepala Cabang"));
    }
}
