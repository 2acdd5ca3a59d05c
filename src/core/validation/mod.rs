//! Validation and filtering of form payloads
//!
//! Request bodies are deserialized into a typed form, passed through the
//! form's filters (trimming) and checked against its declarative
//! `validator` schema before they reach the handlers.

pub mod extractor;
pub mod filters;

pub use extractor::{FormInput, ValidatedJson};
