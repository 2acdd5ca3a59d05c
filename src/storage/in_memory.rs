//! In-memory implementation of DataService for testing and development

use crate::core::{DataService, Entity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory record store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same map.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Entity> InMemoryDataService<T> {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Entity> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.insert(entity.id(), entity.clone());

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.values().cloned().collect())
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records
            .get_mut(id)
            .ok_or_else(|| anyhow!("{} {} not found", T::resource_name_singular(), id))?;

        records.insert(*id, entity.clone());

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(records.remove(id).is_some())
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records
            .values()
            .filter(|record| record.field_as_string(field).as_deref() == Some(value))
            .cloned()
            .collect())
    }
}
