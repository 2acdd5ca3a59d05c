//! Entity trait shared by every persisted record type

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Base trait for all records kept by the service.
///
/// Every record has:
/// - id: Unique identifier
/// - created_at: Creation timestamp
/// - updated_at: Last modification timestamp
///
/// The resource name doubles as the document collection name, so
/// storage backends can stay generic over the record type.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The plural resource name used in URLs and as collection name (e.g., "customers")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "customer")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Value of a top-level field rendered as a string, used for equality queries.
    ///
    /// Returns `None` for unknown fields and for absent optional fields.
    fn field_as_string(&self, field: &str) -> Option<String>;
}
