//! Identity provider backed by an Identity-Toolkit style REST API
//!
//! Gated behind the `remote-auth` feature. Every call is a single HTTPS
//! request; nothing is retried. ID tokens are stateless on the provider
//! side, so signing out is recorded locally.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::auth::{IdentityProvider, Session, UserProfile};
use crate::core::error::AuthError;

/// Client of the hosted identity provider
#[derive(Clone)]
pub struct RemoteIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Signed-out tokens, kept until the provider would reject them anyway
    revoked: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

/// Lifetime of a provider ID token
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    /// Seconds, sent as a string
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'a> {
    post_body: String,
    request_uri: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

/// Map a provider error code onto the service's auth errors
fn map_provider_error(code: &str) -> AuthError {
    // Codes may carry a suffix, e.g. "WEAK_PASSWORD : Password should be ..."
    let code = code.split_whitespace().next().unwrap_or(code);
    match code {
        "EMAIL_EXISTS" => AuthError::EmailTaken {
            email: String::new(),
        },
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            AuthError::InvalidCredentials
        }
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => {
            AuthError::unauthorized("session is no longer valid")
        }
        "INVALID_IDP_RESPONSE" => AuthError::InvalidCredentials,
        "OPERATION_NOT_ALLOWED" | "INVALID_PROVIDER_ID" => AuthError::UnsupportedProvider {
            provider: code.to_string(),
        },
        other => AuthError::Provider {
            message: other.to_string(),
        },
    }
}

impl RemoteIdentityProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            revoked: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, method, self.api_key)
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Provider {
                message: format!("accounts:{} request failed: {}", method, e),
            })?;

        if response.status().is_success() {
            return response.json::<R>().await.map_err(|e| AuthError::Provider {
                message: format!("accounts:{} returned an unexpected body: {}", method, e),
            });
        }

        let status = response.status();
        match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => {
                tracing::warn!(method, code = %envelope.error.message, "identity provider rejected request");
                Err(map_provider_error(&envelope.error.message))
            }
            Err(_) => Err(AuthError::Provider {
                message: format!("accounts:{} failed with status {}", method, status),
            }),
        }
    }

    fn session_from(response: TokenResponse, fallback_email: &str) -> Session {
        let ttl = response
            .expires_in
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(TOKEN_LIFETIME_SECS);
        Session {
            token: response.id_token,
            user: UserProfile {
                user_id: response.local_id,
                email: response.email.unwrap_or_else(|| fallback_email.to_string()),
                display_name: response.display_name.filter(|n| !n.is_empty()),
            },
            expires_at: Utc::now() + Duration::seconds(ttl),
        }
    }

    fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let revoked = self.revoked.read().map_err(|e| AuthError::Provider {
            message: format!("Failed to acquire revocation lock: {}", e),
        })?;
        Ok(revoked.contains_key(token))
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let created: TokenResponse = self
            .call(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await
            .map_err(|e| match e {
                AuthError::EmailTaken { .. } => AuthError::EmailTaken {
                    email: email.to_string(),
                },
                other => other,
            })?;

        let mut session = Self::session_from(created, email);
        let profile = self.update_profile(&session.token, display_name).await?;
        session.user.display_name = profile.display_name;
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response: TokenResponse = self
            .call(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(Self::session_from(response, email))
    }

    async fn sign_in_federated(
        &self,
        provider: &str,
        id_token: &str,
    ) -> Result<Session, AuthError> {
        let response: TokenResponse = self
            .call(
                "signInWithIdp",
                &IdpRequest {
                    post_body: format!("id_token={}&providerId={}", id_token, provider),
                    request_uri: "http://localhost",
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(Self::session_from(response, ""))
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let mut revoked = self.revoked.write().map_err(|e| AuthError::Provider {
            message: format!("Failed to acquire revocation lock: {}", e),
        })?;
        let now = Utc::now();
        revoked.retain(|_, until| *until > now);
        revoked.insert(
            token.to_string(),
            now + Duration::seconds(TOKEN_LIFETIME_SECS),
        );
        Ok(())
    }

    async fn verify(&self, token: &str) -> Result<Session, AuthError> {
        if self.is_revoked(token)? {
            return Err(AuthError::unauthorized("signed out"));
        }

        let response: LookupResponse = self.call("lookup", &LookupRequest { id_token: token }).await?;
        let user = response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::unauthorized("unknown session"))?;

        Ok(Session {
            token: token.to_string(),
            user: UserProfile {
                user_id: user.local_id,
                email: user.email.unwrap_or_default(),
                display_name: user.display_name.filter(|n| !n.is_empty()),
            },
            expires_at: Utc::now() + Duration::seconds(TOKEN_LIFETIME_SECS),
        })
    }

    async fn update_profile(
        &self,
        token: &str,
        display_name: &str,
    ) -> Result<UserProfile, AuthError> {
        let response: LookupUser = self
            .call(
                "update",
                &UpdateRequest {
                    id_token: token,
                    display_name,
                    return_secure_token: false,
                },
            )
            .await?;

        Ok(UserProfile {
            user_id: response.local_id,
            email: response.email.unwrap_or_default(),
            display_name: response.display_name.filter(|n| !n.is_empty()),
        })
    }
}
