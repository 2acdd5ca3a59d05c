//! MongoDB document store using the official async driver.
//!
//! Gated behind the `mongodb_backend` feature:
//! ```toml
//! [dependencies]
//! kyc-records = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! One collection per record type, named after `T::resource_name()`
//! (`customers`, `transactions`). Records are written as whole documents and
//! updated by full replacement.
//!
//! # Serialization strategy
//!
//! Records go through `serde_json::Value` before becoming BSON, so UUIDs and
//! timestamps are stored as strings exactly as they appear on the wire. The
//! `id` field is mapped to MongoDB's `_id`.

use crate::core::{DataService, Entity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Database, IndexModel};
use uuid::Uuid;

/// Convert a JSON object into a BSON document, renaming `id` to `_id`
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON document back into JSON, renaming `_id` to `id`
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Record store backed by one MongoDB collection
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use kyc::storage::MongoDataService;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let customers = MongoDataService::<Customer>::new(client.database("kyc"));
/// let created = customers.create(customer).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDataService<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoDataService<T> {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<T: Entity> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    /// Create single-field indexes used by equality searches
    ///
    /// Idempotent, safe to call on every startup.
    pub async fn ensure_indexes(&self, fields: &[&str]) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let indexes: Vec<IndexModel> = fields
            .iter()
            .map(|field| IndexModel::builder().keys(doc! { *field: 1 }).build())
            .collect();

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to create indexes on {} collection: {}",
                    T::resource_name(),
                    e
                )
            })?;

        Ok(())
    }

    fn entity_to_document(entity: &T) -> Result<Document> {
        let json = serde_json::to_value(entity)
            .map_err(|e| anyhow!("Failed to serialize {}: {}", T::resource_name_singular(), e))?;
        json_to_document(json)
    }

    fn document_to_entity(doc: Document) -> Result<T> {
        let json = document_to_json(doc);
        serde_json::from_value(json).map_err(|e| {
            anyhow!(
                "Failed to deserialize {} from document: {}",
                T::resource_name_singular(),
                e
            )
        })
    }

    async fn find_all(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self
            .collection()
            .find(filter)
            .await
            .map_err(|e| anyhow!("Failed to query {}: {}", T::resource_name(), e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect {}: {}", T::resource_name(), e))?;

        docs.into_iter().map(Self::document_to_entity).collect()
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for MongoDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to create {}: {}", T::resource_name_singular(), e))?;

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get {}: {}", T::resource_name_singular(), e))?;

        doc.map(Self::document_to_entity).transpose()
    }

    async fn list(&self) -> Result<Vec<T>> {
        self.find_all(doc! {}).await
    }

    /// Full-document replacement; fails when no document matched
    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": uuid_bson(id) }, doc)
            .await
            .map_err(|e| anyhow!("Failed to update {}: {}", T::resource_name_singular(), e))?;

        if result.matched_count == 0 {
            return Err(anyhow!("{} {} not found", T::resource_name_singular(), id));
        }

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete {}: {}", T::resource_name_singular(), e))?;

        Ok(result.deleted_count > 0)
    }

    /// Equality on a string field; `id` is translated to `_id`
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let field = if field == "id" { "_id" } else { field };
        self.find_all(doc! { field: value }).await
    }
}
