//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Error conversions work correctly
//! - Error matching allows clients to handle specific cases

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kyc::core::error::{
    AuthError, ConfigError, EntityError, KycError, RequestError, StorageError, ValidationError,
};
use kyc::domain::{Customer, CustomerInput, Transaction};
use uuid::Uuid;
use validator::Validate;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_entity_not_found_returns_404() {
        let err: KycError = EntityError::not_found::<Customer>(Uuid::new_v4()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_error_returns_400() {
        let err: KycError = ValidationError::field("nik", "NIK must be exactly 16 characters").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_errors_status() {
        let cases = [
            (AuthError::unauthorized("missing token"), StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                AuthError::EmailTaken {
                    email: "a@b.co".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                AuthError::UnsupportedProvider {
                    provider: "facebook.com".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::Provider {
                    message: "timeout".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(KycError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_storage_error_returns_500() {
        let err: KycError = StorageError::ConnectionError {
            backend: "mongodb".to_string(),
            message: "connection refused".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_config_error_returns_500() {
        let err: KycError = ConfigError::InvalidValue {
            field: "server.bind".to_string(),
            value: "".to_string(),
            message: "must not be empty".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_request_errors_return_400() {
        let err: KycError = RequestError::InvalidEntityId {
            id: "not-a-uuid".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: KycError = RequestError::InvalidQuery {
            message: "page: invalid digit".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_entity_error_codes() {
        let err: KycError = EntityError::not_found::<Transaction>(Uuid::nil()).into();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }

    #[test]
    fn test_request_error_codes() {
        let err: KycError = RequestError::InvalidEntityId {
            id: "x".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "INVALID_ENTITY_ID");

        let err: KycError = RequestError::InvalidQuery {
            message: "x".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "INVALID_QUERY");
    }

    #[test]
    fn test_auth_error_codes() {
        assert_eq!(
            KycError::from(AuthError::InvalidCredentials).error_code(),
            "INVALID_CREDENTIALS"
        );
        assert_eq!(
            KycError::from(AuthError::unauthorized("expired")).error_code(),
            "UNAUTHORIZED"
        );
    }
}

// =============================================================================
// Error Response Tests
// =============================================================================

mod error_response_tests {
    use super::*;

    #[test]
    fn test_error_response_has_code_and_message() {
        let err: KycError = AuthError::InvalidCredentials.into();
        let response = err.to_response();

        assert_eq!(response.code, "INVALID_CREDENTIALS");
        assert_eq!(response.message, "Invalid email or password");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_not_found_details_point_back_to_list() {
        let id = Uuid::new_v4();
        let err: KycError = EntityError::not_found::<Transaction>(id).into();
        let details = err.to_response().details.unwrap();

        assert_eq!(details["entity_type"], "transaction");
        assert_eq!(details["id"], id.to_string());
        assert_eq!(details["back_to"], "/transactions");
    }

    #[test]
    fn test_validation_errors_include_field_details() {
        let input = CustomerInput {
            nik: "123".to_string(),
            full_name: "B".to_string(),
            address: "Jl. Merdeka No. 1, Bandung".to_string(),
            ..Default::default()
        };
        let err: KycError = input.validate().unwrap_err().into();
        let details = err.to_response().details.unwrap();

        let fields: Vec<&str> = details["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["full_name", "nik"]);
    }

    #[test]
    fn test_server_errors_hide_the_cause() {
        let err: KycError = StorageError::query(anyhow::anyhow!("socket closed")).into();
        let response = err.to_response();

        assert_eq!(response.code, "STORAGE_ERROR");
        assert!(!response.message.contains("socket closed"));
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_anyhow_error_converts_to_storage_error() {
        let err: KycError = anyhow::anyhow!("Failed to acquire write lock").into();
        assert!(matches!(
            err,
            KycError::Storage(StorageError::QueryError { ref message }) if message.contains("write lock")
        ));
    }

    #[test]
    fn test_yaml_error_converts_to_config_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("key: [unclosed").unwrap_err();
        let err: ConfigError = yaml_err.into();
        assert!(matches!(err, ConfigError::ParseError { file: None, .. }));
    }

    #[test]
    fn test_io_error_converts_to_config_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "kyc.yaml");
        let err: ConfigError = io_err.into();
        assert!(err.to_string().contains("kyc.yaml"));
    }
}

// =============================================================================
// IntoResponse Tests
// =============================================================================

mod into_response_tests {
    use super::*;

    #[tokio::test]
    async fn test_into_response_status_and_body() {
        let err: KycError = EntityError::not_found::<Customer>(Uuid::nil()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "ENTITY_NOT_FOUND");
        assert_eq!(body["details"]["back_to"], "/customers");
    }
}
