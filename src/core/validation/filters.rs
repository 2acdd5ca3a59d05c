//! Reusable field filters
//!
//! These filters transform form field values before validation

/// Filter: trim whitespace from a string
pub fn trim(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Filter: trim an optional string, turning blank values into `None`
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value.map(trim).filter(|s| !s.is_empty())
}

/// Validator: string must not be blank
///
/// Used with `#[validate(custom(function = "not_blank"))]`.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("must not be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}
