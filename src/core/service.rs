//! Service trait for data operations

use crate::core::Data;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Service trait for managing data entities
///
/// Implementations provide CRUD operations for a specific entity type.
/// The rest of the crate is agnostic to the underlying storage mechanism:
/// the ordered collection manager and the courier tracker only ever talk
/// to a `DataService`.
#[async_trait]
pub trait DataService<T: Data>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: T) -> Result<T>;

    /// Get an entity by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all entities (no ordering guarantee)
    async fn list(&self) -> Result<Vec<T>>;

    /// Update an existing entity
    ///
    /// Returns `Err` if no entity with `id` exists.
    async fn update(&self, id: &Uuid, entity: T) -> Result<T>;

    /// Delete an entity
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// Search entities by field values
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;
    use chrono::{DateTime, Utc};

    #[allow(dead_code)]
    #[derive(Clone, Debug)]
    struct TestEntity {
        id: Uuid,
        created_at: DateTime<Utc>,
        name: String,
    }

    impl Entity for TestEntity {
        fn resource_name() -> &'static str {
            "tests"
        }

        fn resource_name_singular() -> &'static str {
            "test"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn entity_type(&self) -> &str {
            "test"
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn updated_at(&self) -> DateTime<Utc> {
            self.created_at
        }
    }

    impl Data for TestEntity {
        fn name(&self) -> &str {
            &self.name
        }

        fn indexed_fields() -> &'static [&'static str] {
            &[]
        }

        fn field_value(&self, _field: &str) -> Option<crate::core::field::FieldValue> {
            None
        }
    }

    // The trait is object safe and usable behind Arc<dyn _>
    #[allow(dead_code)]
    fn erase<S: DataService<TestEntity> + 'static>(service: S) -> std::sync::Arc<dyn DataService<TestEntity>> {
        std::sync::Arc::new(service)
    }

    #[test]
    fn test_traits_compile() {}
}
