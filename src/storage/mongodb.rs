//! MongoDB storage backend using the official MongoDB async driver.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! storefront-rs = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! Each `MongoDataService<T>` operates on its own collection named after
//! `T::resource_name()` (`categories`, `products`, `sliders`, `orders`).
//!
//! # Serialization strategy
//!
//! Entities go through `serde_json::Value` on their way to BSON. UUIDs and
//! timestamps therefore land as strings, and the `id` field is stored as
//! MongoDB's `_id`.

use crate::core::{Data, DataService};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Database};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Turn a JSON object into a BSON document, moving `id` to `_id`.
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

/// Turn a stored document back into JSON, moving `_id` to `id`.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Candidate BSON values for a raw search string.
///
/// Search receives strings only, while documents keep native numbers and
/// booleans, so a query for `"25"` must also match the integer `25`.
fn search_variants(value: &str) -> Vec<Bson> {
    let mut variants = vec![Bson::String(value.to_string())];

    match value {
        "true" => variants.push(Bson::Boolean(true)),
        "false" => variants.push(Bson::Boolean(false)),
        _ => {
            if let Ok(i) = value.parse::<i64>() {
                variants.push(Bson::Int64(i));
                variants.push(Bson::Double(i as f64));
            } else if let Ok(f) = value.parse::<f64>() {
                variants.push(Bson::Double(f));
            }
        }
    }

    variants
}

/// Open a client and pick the database named in the storage configuration.
pub async fn connect(uri: &str, database: &str) -> Result<Database> {
    let client = Client::with_uri_str(uri)
        .await
        .map_err(|e| anyhow!("Failed to connect to MongoDB at {}: {}", uri, e))?;
    Ok(client.database(database))
}

// ---------------------------------------------------------------------------
// MongoDataService<T>
// ---------------------------------------------------------------------------

/// Generic data storage service backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use storefront::storage::{MongoDataService, mongodb::connect};
///
/// let db = connect("mongodb://localhost:27017", "storefront").await?;
/// let categories = MongoDataService::<Category>::new(db);
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

impl<T: Data + Serialize + DeserializeOwned> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    fn entity_to_document(entity: &T) -> Result<Document> {
        let json = serde_json::to_value(entity)
            .map_err(|e| anyhow!("Failed to serialize entity: {}", e))?;
        json_to_document(json)
    }

    fn document_to_entity(doc: Document) -> Result<T> {
        let json = document_to_json(doc);
        serde_json::from_value(json)
            .map_err(|e| anyhow!("Failed to deserialize entity from document: {}", e))
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get entity: {}", e))?;

        doc.map(Self::document_to_entity).transpose()
    }
}

#[async_trait]
impl<T: Data + Serialize + DeserializeOwned> DataService<T> for MongoDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to create {}: {}", T::resource_name_singular(), e))?;

        self.find_by_id(&entity.id())
            .await?
            .ok_or_else(|| anyhow!("Entity not found after insert"))
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        self.find_by_id(id).await
    }

    /// Oldest first; callers that need display order sort by `order` themselves.
    async fn list(&self) -> Result<Vec<T>> {
        let cursor = self
            .collection()
            .find(doc! {})
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(|e| anyhow!("Failed to list entities: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect entities: {}", e))?;

        docs.into_iter().map(Self::document_to_entity).collect()
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": uuid_bson(id) }, doc)
            .await
            .map_err(|e| anyhow!("Failed to update entity: {}", e))?;

        if result.matched_count == 0 {
            return Err(anyhow!("Entity not found: {}", id));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("Entity not found after update"))
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        self.collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete entity: {}", e))?;

        Ok(())
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let field = if field == "id" { "_id" } else { field };
        let filter = doc! { field: { "$in": search_variants(value) } };

        let cursor = self
            .collection()
            .find(filter)
            .await
            .map_err(|e| anyhow!("Failed to search entities: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect search results: {}", e))?;

        docs.into_iter().map(Self::document_to_entity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_to_document_renames_id_to_underscore_id() {
        let doc = json_to_document(json!({"id": "abc", "name": "Shoes"})).unwrap();

        assert_eq!(doc.get_str("_id").unwrap(), "abc");
        assert!(!doc.contains_key("id"));
        assert_eq!(doc.get_str("name").unwrap(), "Shoes");
    }

    #[test]
    fn json_to_document_keeps_native_numbers() {
        let doc = json_to_document(json!({"id": "abc", "order": 3, "price": 12.5})).unwrap();

        assert_eq!(doc.get_i64("order").unwrap(), 3);
        assert_eq!(doc.get_f64("price").unwrap(), 12.5);
    }

    #[test]
    fn json_to_document_non_object_returns_error() {
        let err = json_to_document(json!("string")).unwrap_err();
        assert!(err.to_string().contains("non-object"));
    }

    #[test]
    fn document_to_json_restores_id() {
        let json = document_to_json(doc! { "_id": "abc", "order": 2_i64 });

        assert_eq!(json["id"], "abc");
        assert_eq!(json["order"], 2);
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn category_survives_document_roundtrip() {
        use crate::entities::Category;

        let mut category = Category::new("Shoes".into(), "shoes".into(), None);
        category.order = 4;
        let doc = MongoDataService::<Category>::entity_to_document(&category).unwrap();
        let back = MongoDataService::<Category>::document_to_entity(doc).unwrap();

        assert_eq!(back, category);
    }

    #[test]
    fn search_variants_cover_native_types() {
        assert_eq!(search_variants("shoes"), vec![Bson::String("shoes".into())]);
        assert!(search_variants("true").contains(&Bson::Boolean(true)));
        assert!(search_variants("3").contains(&Bson::Int64(3)));
        assert!(search_variants("2.5").contains(&Bson::Double(2.5)));
    }
}
