//! Entity traits defining the core abstraction for all stored records

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all entities in the system.
///
/// Every stored record has:
/// - id: Unique identifier
/// - type: Entity type name (e.g., "category", "order")
/// - created_at: Creation timestamp
/// - updated_at: Last modification timestamp
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs and collection names (e.g., "categories")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "category")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the entity type name
    fn entity_type(&self) -> &str;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;
}

/// Trait for data entities that represent concrete domain objects.
///
/// Data entities extend the base Entity with:
/// - name: A human-readable name
/// - indexed_fields: Fields that can be searched
/// - field_value: Dynamic field access, used by storage backends for search
pub trait Data: Entity {
    /// Get the name of this data entity
    fn name(&self) -> &str;

    /// List of fields that should be indexed for searching
    fn indexed_fields() -> &'static [&'static str];

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<crate::core::field::FieldValue>;
}

/// Data entities that carry a dense display position.
///
/// The `order` value is 1-based and unique inside one collection. Only the
/// [`OrderedCollection`](crate::ordering::OrderedCollection) writes it through
/// [`Orderable::set_order`]; everything else treats it as read-only.
pub trait Orderable: Data {
    /// Current display position
    fn order(&self) -> i64;

    /// Overwrite the display position and touch `updated_at`
    fn set_order(&mut self, order: i64);

    /// Whether the record is visible on the storefront
    fn is_active(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct TestSlot {
        id: Uuid,
        entity_type: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        name: String,
        order: i64,
        is_active: bool,
    }

    impl Entity for TestSlot {
        fn resource_name() -> &'static str {
            "test_slots"
        }

        fn resource_name_singular() -> &'static str {
            "test_slot"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn entity_type(&self) -> &str {
            &self.entity_type
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn updated_at(&self) -> DateTime<Utc> {
            self.updated_at
        }
    }

    impl Data for TestSlot {
        fn name(&self) -> &str {
            &self.name
        }

        fn indexed_fields() -> &'static [&'static str] {
            &["name"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(FieldValue::String(self.name.clone())),
                "order" => Some(FieldValue::Integer(self.order)),
                _ => None,
            }
        }
    }

    impl Orderable for TestSlot {
        fn order(&self) -> i64 {
            self.order
        }

        fn set_order(&mut self, order: i64) {
            self.order = order;
            self.updated_at = Utc::now();
        }

        fn is_active(&self) -> bool {
            self.is_active
        }
    }

    #[test]
    fn test_set_order_touches_updated_at() {
        let then = Utc::now() - chrono::Duration::seconds(10);
        let mut slot = TestSlot {
            id: Uuid::new_v4(),
            entity_type: "test_slot".to_string(),
            created_at: then,
            updated_at: then,
            name: "first".to_string(),
            order: 3,
            is_active: true,
        };

        slot.set_order(1);
        assert_eq!(slot.order(), 1);
        assert!(slot.updated_at() > then);
        assert_eq!(slot.created_at(), then);
    }

    #[test]
    fn test_entity_metadata() {
        assert_eq!(TestSlot::resource_name(), "test_slots");
        assert_eq!(TestSlot::resource_name_singular(), "test_slot");
    }
}
