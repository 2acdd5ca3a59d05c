//! Typed error handling for the KYC service
//!
//! Handlers return [`KycError`], which knows its HTTP status, its stable
//! error code and how to render itself as a JSON body.
//!
//! # Error Categories
//!
//! - [`EntityError`]: record lookups (not found)
//! - [`ValidationError`]: form / payload validation
//! - [`StorageError`]: document store failures
//! - [`AuthError`]: identity provider and session failures
//! - [`ConfigError`]: configuration parsing
//! - [`RequestError`]: malformed requests
//!
//! # Example
//!
//! ```rust,ignore
//! async fn load(service: &dyn DataService<Customer>, id: Uuid) -> KycResult<Customer> {
//!     service
//!         .get(&id)
//!         .await
//!         .map_err(StorageError::query)?
//!         .ok_or_else(|| EntityError::not_found::<Customer>(id).into())
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::core::Entity;

/// The main error type of the service
#[derive(Debug, Error)]
pub enum KycError {
    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Request(#[from] RequestError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl KycError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            KycError::Entity(e) => e.status_code(),
            KycError::Validation(_) => StatusCode::BAD_REQUEST,
            KycError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            KycError::Auth(e) => e.status_code(),
            KycError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            KycError::Request(e) => e.status_code(),
            KycError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            KycError::Entity(e) => e.error_code(),
            KycError::Validation(_) => "VALIDATION_ERROR",
            KycError::Storage(_) => "STORAGE_ERROR",
            KycError::Auth(e) => e.error_code(),
            KycError::Config(_) => "CONFIG_ERROR",
            KycError::Request(e) => e.error_code(),
            KycError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Server-side failures are reported with a generic message; the
    /// underlying cause only goes to the log.
    pub fn to_response(&self) -> ErrorResponse {
        let message = if self.status_code().is_server_error() {
            "The request could not be completed, please try again later".to_string()
        } else {
            self.to_string()
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            KycError::Entity(EntityError::NotFound {
                entity_type,
                id,
                back_to,
            }) => Some(serde_json::json!({
                "entity_type": entity_type,
                "id": id.to_string(),
                "back_to": back_to,
            })),
            KycError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for KycError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record lookups
#[derive(Debug, Error)]
pub enum EntityError {
    /// Record was not found; `back_to` points at the list the client came from
    #[error("{entity_type} with id '{id}' not found")]
    NotFound {
        entity_type: String,
        id: Uuid,
        back_to: String,
    },
}

impl EntityError {
    pub fn not_found<T: Entity>(id: Uuid) -> Self {
        EntityError::NotFound {
            entity_type: T::resource_name_singular().to_string(),
            id,
            back_to: format!("/{}", T::resource_name()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more fields failed their schema checks
    #[error("Validation errors: {}", join_fields(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Body is not valid JSON or does not have the expected shape
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_fields(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldErrors(vec![FieldValidationError {
            field: field.into(),
            message: message.into(),
        }])
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        // HashMap order is not stable
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for KycError {
    fn from(errors: validator::ValidationErrors) -> Self {
        KycError::Validation(errors.into())
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    #[error("Storage query error: {message}")]
    QueryError { message: String },
}

impl StorageError {
    /// Wrap a failure coming out of a `DataService` call
    pub fn query(err: anyhow::Error) -> Self {
        StorageError::QueryError {
            message: format!("{:#}", err),
        }
    }
}

impl From<anyhow::Error> for KycError {
    fn from(err: anyhow::Error) -> Self {
        KycError::Storage(StorageError::query(err))
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to authentication
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email '{email}' is already registered")]
    EmailTaken { email: String },

    #[error("Unsupported identity provider '{provider}'")]
    UnsupportedProvider { provider: String },

    #[error("Identity provider error: {message}")]
    Provider { message: String },
}

impl AuthError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AuthError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::EmailTaken { .. } => StatusCode::CONFLICT,
            AuthError::UnsupportedProvider { .. } => StatusCode::BAD_REQUEST,
            AuthError::Provider { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthorized { .. } => "UNAUTHORIZED",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::EmailTaken { .. } => "EMAIL_TAKEN",
            AuthError::UnsupportedProvider { .. } => "UNSUPPORTED_PROVIDER",
            AuthError::Provider { .. } => "IDENTITY_PROVIDER_ERROR",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value '{value}' for '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid entity ID format: '{id}'")]
    InvalidEntityId { id: String },

    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidEntityId { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidEntityId { .. } => "INVALID_ENTITY_ID",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
        }
    }
}

/// A specialized Result type for handler code
pub type KycResult<T> = Result<T, KycError>;
