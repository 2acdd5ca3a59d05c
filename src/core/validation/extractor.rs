//! Axum extractor for validated form payloads
//!
//! This module provides the `ValidatedJson<T>` extractor that filters and
//! validates request payloads before they reach handlers.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::core::error::{KycError, ValidationError};

/// A typed form body with a declarative schema
pub trait FormInput: DeserializeOwned + Validate {
    /// Apply field filters (trimming, blank-to-none) before validation
    fn normalize(self) -> Self {
        self
    }

    /// Name a struct field the way clients send it
    fn wire_field(field: &str) -> &str {
        field
    }
}

/// Axum extractor that filters and validates a form payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_customer(
///     State(state): State<AppState>,
///     ValidatedJson(form): ValidatedJson<CustomerInput>,
/// ) -> KycResult<(StatusCode, Json<Customer>)> {
///     // form is already filtered and validated
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T: FormInput> ValidatedJson<T> {
    /// Filter and validate an already-parsed JSON payload
    pub fn from_value(payload: Value) -> Result<Self, KycError> {
        let form: T = serde_json::from_value(payload).map_err(|e| {
            ValidationError::InvalidJson {
                message: e.to_string(),
            }
        })?;

        let form = form.normalize();
        form.validate().map_err(wire_names::<T>)?;

        Ok(ValidatedJson(form))
    }
}

fn wire_names<T: FormInput>(errors: validator::ValidationErrors) -> ValidationError {
    match ValidationError::from(errors) {
        ValidationError::FieldErrors(mut fields) => {
            for error in &mut fields {
                error.field = T::wire_field(&error.field).to_string();
            }
            fields.sort_by(|a, b| a.field.cmp(&b.field));
            ValidationError::FieldErrors(fields)
        }
        other => other,
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: FormInput + Send,
{
    type Rejection = KycError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = Json::from_request(req, state).await.map_err(|e| {
            ValidationError::InvalidJson {
                message: e.body_text(),
            }
        })?;

        Self::from_value(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::filters;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Validate)]
    struct NameForm {
        #[validate(length(min = 2, message = "too short"))]
        name: String,
    }

    impl FormInput for NameForm {
        fn normalize(mut self) -> Self {
            self.name = filters::trim(self.name);
            self
        }
    }

    #[test]
    fn test_valid_payload_is_filtered() {
        let ValidatedJson(form) =
            ValidatedJson::<NameForm>::from_value(json!({"name": "  Budi  "})).unwrap();
        assert_eq!(form.name, "Budi");
    }

    #[test]
    fn test_filter_runs_before_validation() {
        let err = ValidatedJson::<NameForm>::from_value(json!({"name": "  B  "})).unwrap_err();
        match err {
            KycError::Validation(ValidationError::FieldErrors(fields)) => {
                assert_eq!(fields[0].field, "name");
                assert_eq!(fields[0].message, "too short");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[derive(Debug, Deserialize, Validate)]
    struct KindForm {
        #[serde(rename = "type")]
        #[validate(required(message = "type is required"))]
        kind: Option<String>,
        #[validate(length(min = 1, message = "required"))]
        #[serde(default)]
        note: String,
    }

    impl FormInput for KindForm {
        fn wire_field(field: &str) -> &str {
            match field {
                "kind" => "type",
                other => other,
            }
        }
    }

    #[test]
    fn test_errors_use_wire_field_names() {
        let err = ValidatedJson::<KindForm>::from_value(json!({})).unwrap_err();
        match err {
            KycError::Validation(ValidationError::FieldErrors(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["note", "type"]);
                assert_eq!(fields[1].message, "type is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_invalid_json() {
        let err = ValidatedJson::<NameForm>::from_value(json!({"name": 42})).unwrap_err();
        assert!(matches!(
            err,
            KycError::Validation(ValidationError::InvalidJson { .. })
        ));
    }
}
