//! Authentication endpoints
//!
//! Thin pass-through to the configured [`IdentityProvider`]; forms are
//! validated here so malformed credentials never reach the provider.
//!
//! [`IdentityProvider`]: crate::core::IdentityProvider

use axum::http::StatusCode;
use axum::{Extension, Json};
use axum::extract::State;
use serde::Deserialize;
use validator::Validate;

use crate::core::auth::{AuthContext, Session, UserProfile};
use crate::core::error::{AuthError, KycResult};
use crate::core::validation::filters::{self, not_blank};
use crate::core::validation::{FormInput, ValidatedJson};
use crate::server::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

impl FormInput for LoginInput {
    fn normalize(mut self) -> Self {
        self.email = filters::trim(self.email);
        self
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[serde(default)]
    #[validate(length(min = 2, message = "display name must be at least 2 characters"))]
    pub display_name: String,

    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

impl FormInput for RegisterInput {
    fn normalize(mut self) -> Self {
        self.display_name = filters::trim(self.display_name);
        self.email = filters::trim(self.email);
        self
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct FederatedInput {
    /// Provider id, e.g. `google.com`
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub provider: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub id_token: String,
}

impl FormInput for FederatedInput {
    fn normalize(mut self) -> Self {
        self.provider = filters::trim(self.provider);
        self.id_token = filters::trim(self.id_token);
        self
    }
}

/// Settings page form
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileInput {
    #[serde(default)]
    #[validate(length(min = 2, message = "display name must be at least 2 characters"))]
    pub display_name: String,
}

impl FormInput for ProfileInput {
    fn normalize(mut self) -> Self {
        self.display_name = filters::trim(self.display_name);
        self
    }
}

/// Token of the current request, even when the guard is relaxed
fn session_token(context: &AuthContext) -> KycResult<&str> {
    context
        .token()
        .ok_or_else(|| AuthError::unauthorized("sign in required").into())
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<RegisterInput>,
) -> KycResult<(StatusCode, Json<Session>)> {
    let session = state
        .identity
        .sign_up(&form.email, &form.password, &form.display_name)
        .await?;
    tracing::info!(user_id = %session.user.user_id, "account registered");
    Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<LoginInput>,
) -> KycResult<Json<Session>> {
    let session = state.identity.sign_in(&form.email, &form.password).await?;
    tracing::info!(user_id = %session.user.user_id, "signed in");
    Ok(Json(session))
}

/// `POST /auth/federated`
pub async fn federated(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<FederatedInput>,
) -> KycResult<Json<Session>> {
    let session = state
        .identity
        .sign_in_federated(&form.provider, &form.id_token)
        .await?;
    tracing::info!(user_id = %session.user.user_id, provider = %form.provider, "signed in");
    Ok(Json(session))
}

/// `POST /auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> KycResult<StatusCode> {
    let token = session_token(&context)?;
    state.identity.sign_out(token).await?;
    if let Some(user) = context.user() {
        tracing::info!(user_id = %user.user_id, "signed out");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/me`
pub async fn me(Extension(context): Extension<AuthContext>) -> KycResult<Json<UserProfile>> {
    context
        .user()
        .cloned()
        .map(Json)
        .ok_or_else(|| AuthError::unauthorized("sign in required").into())
}

/// `PUT /auth/me`
pub async fn update_me(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    ValidatedJson(form): ValidatedJson<ProfileInput>,
) -> KycResult<Json<UserProfile>> {
    let token = session_token(&context)?;
    let profile = state
        .identity
        .update_profile(token, &form.display_name)
        .await?;
    Ok(Json(profile))
}
