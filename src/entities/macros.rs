//! Macros for reducing boilerplate when defining catalog entities
//!
//! Every orderable collection shares the same identity, timestamp and
//! position fields; the macro injects them and wires up the `Entity`,
//! `Data` and `Orderable` traits so each entity file only declares what is
//! specific to it.

/// Complete macro to create an orderable catalog entity
///
/// Injects: id, entity_type, created_at, updated_at, name, order, is_active
///
/// # Example
///
/// ```rust,ignore
/// use storefront::prelude::*;
///
/// impl_orderable_entity!(
///     Brand,
///     "brand",
///     "brands",
///     ["name", "slug"],
///     {
///         slug: String,
///         logo: Option<String>,
///     }
/// );
///
/// let brand = Brand::new("Acme".to_string(), "acme".to_string(), None);
/// assert_eq!(brand.order, 0); // assigned by the OrderedCollection on insert
/// ```
#[macro_export]
macro_rules! impl_orderable_entity {
    (
        $type:ident,
        $type_name:expr,
        $plural_name:expr,
        [ $( $indexed_field:expr ),* $(,)? ],
        {
            $( $specific_field:ident : $specific_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this entity
            pub id: ::uuid::Uuid,

            /// Type of the entity
            #[serde(rename = "type")]
            pub entity_type: String,

            /// When this entity was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this entity was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,

            /// Display name
            pub name: String,

            /// 1-based display position inside the collection
            pub order: i64,

            /// Visible on the storefront
            pub is_active: bool,
            $( pub $specific_field : $specific_type ),*
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural_name
            }

            fn resource_name_singular() -> &'static str {
                $type_name
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn entity_type(&self) -> &str {
                &self.entity_type
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }
        }

        impl $crate::core::entity::Data for $type {
            fn name(&self) -> &str {
                &self.name
            }

            fn indexed_fields() -> &'static [&'static str] {
                &[ $( $indexed_field ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                use $crate::core::field::ToFieldValue;
                match field {
                    "name" => Some(self.name.to_field_value()),
                    "order" => Some(self.order.to_field_value()),
                    "is_active" => Some(self.is_active.to_field_value()),
                    $( stringify!($specific_field) => Some(self.$specific_field.to_field_value()), )*
                    _ => None,
                }
            }
        }

        impl $crate::core::entity::Orderable for $type {
            fn order(&self) -> i64 {
                self.order
            }

            fn set_order(&mut self, order: i64) {
                self.order = order;
                self.touch();
            }

            fn is_active(&self) -> bool {
                self.is_active
            }
        }

        impl $type {
            /// Create a new, active instance with no position yet
            pub fn new(
                name: String,
                $( $specific_field: $specific_type ),*
            ) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    entity_type: $type_name.to_string(),
                    created_at: now,
                    updated_at: now,
                    name,
                    order: 0,
                    is_active: true,
                    $( $specific_field ),*
                }
            }

            /// Update the updated_at timestamp to now
            pub fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::entity::{Data, Entity, Orderable};
    use crate::core::field::FieldValue;

    crate::impl_orderable_entity!(Shelf, "shelf", "shelves", ["name", "aisle"], {
        aisle: i64,
        label: Option<String>,
    });

    #[test]
    fn test_generated_entity() {
        let shelf = Shelf::new("Top".to_string(), 4, None);
        assert_eq!(Shelf::resource_name(), "shelves");
        assert_eq!(Shelf::resource_name_singular(), "shelf");
        assert_eq!(shelf.entity_type(), "shelf");
        assert_eq!(shelf.order(), 0);
        assert!(shelf.is_active());
        assert_eq!(Shelf::indexed_fields(), &["name", "aisle"]);
    }

    #[test]
    fn test_generated_field_values() {
        let shelf = Shelf::new("Top".to_string(), 4, None);
        assert_eq!(shelf.field_value("aisle"), Some(FieldValue::Integer(4)));
        assert_eq!(shelf.field_value("label"), Some(FieldValue::Null));
        assert_eq!(shelf.field_value("is_active"), Some(FieldValue::Boolean(true)));
        assert_eq!(shelf.field_value("missing"), None);
    }

    #[test]
    fn test_serde_uses_type_key() {
        let shelf = Shelf::new("Top".to_string(), 1, Some("A".to_string()));
        let json = serde_json::to_value(&shelf).unwrap();
        assert_eq!(json["type"], "shelf");
        assert!(json.get("entity_type").is_none());
        assert_eq!(json["label"], "A");
    }
}
