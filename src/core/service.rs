//! Service trait for record storage

use crate::core::Entity;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage contract for one record type
///
/// Implementations own the persistence protocol (in-memory map, MongoDB
/// collection, ...). The service layer never re-validates records: what the
/// handlers accept is what gets written.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Insert a new record
    async fn create(&self, entity: T) -> Result<T>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all records
    async fn list(&self) -> Result<Vec<T>>;

    /// Overwrite an existing record
    ///
    /// Fails when no record with this ID exists.
    async fn update(&self, id: &Uuid, entity: T) -> Result<T>;

    /// Delete a record
    ///
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: &Uuid) -> Result<bool>;

    /// Find records whose `field` equals `value` (e.g. `customer_id == id`)
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>>;
}
