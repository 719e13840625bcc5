//! In-memory implementation of DataService for testing and development

use crate::core::{Data, DataService};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory data service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Cloning shares the underlying map.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> InMemoryDataService<T> {
    /// Create a new in-memory data service
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Data> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if records.contains_key(&entity.id()) {
            return Err(anyhow!("Entity already exists: {}", entity.id()));
        }
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
            .ok_or_else(|| anyhow!("Entity not found: {}", id))?;

        records.insert(*id, entity.clone());

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.remove(id);

        Ok(())
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records
            .values()
            .filter(|record| {
                record
                    .field_value(field)
                    .is_some_and(|v| v.matches_str(value))
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Category;

    fn category(name: &str, slug: &str) -> Category {
        Category::new(name.to_string(), slug.to_string(), None)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = InMemoryDataService::<Category>::new();
        let created = service.create(category("Shoes", "shoes")).await.unwrap();

        let fetched = service.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_duplicate_id_fails() {
        let service = InMemoryDataService::<Category>::new();
        let created = service.create(category("Shoes", "shoes")).await.unwrap();
        assert!(service.create(created).await.is_err());
    }

    #[tokio::test]
    async fn test_update_missing_fails() {
        let service = InMemoryDataService::<Category>::new();
        let orphan = category("Ghost", "ghost");
        assert!(service.update(&orphan.id, orphan.clone()).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = InMemoryDataService::<Category>::new();
        let created = service.create(category("Shoes", "shoes")).await.unwrap();

        service.delete(&created.id).await.unwrap();
        service.delete(&created.id).await.unwrap();
        assert!(service.get(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_by_field() {
        let service = InMemoryDataService::<Category>::new();
        service.create(category("Shoes", "shoes")).await.unwrap();
        service.create(category("Bags", "bags")).await.unwrap();

        let found = service.search("slug", "bags").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Bags");

        assert!(service.search("unknown", "x").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let service = InMemoryDataService::<Category>::new();
        let other = service.clone();
        service.create(category("Shoes", "shoes")).await.unwrap();
        assert_eq!(other.list().await.unwrap().len(), 1);
    }
}
