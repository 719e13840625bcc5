//! Entity registry for the ordered catalog collections and their REST routes

use crate::entities::CatalogEntity;
use crate::ordering::OrderedCollection;
use crate::server::exposure::rest::collections;
use axum::Router;
use std::collections::HashMap;

/// Trait that describes how to build routes for an entity
///
/// Each catalog collection (categories, products, sliders) is registered
/// through one descriptor.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "category")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "categories")
    fn plural(&self) -> &str;

    /// Build the routes for this entity
    fn build_routes(&self) -> Router;
}

/// Descriptor for an [`OrderedCollection`] of a catalog entity
pub struct CollectionDescriptor<T: CatalogEntity> {
    collection: OrderedCollection<T>,
}

impl<T: CatalogEntity> CollectionDescriptor<T> {
    pub fn new(collection: OrderedCollection<T>) -> Self {
        Self { collection }
    }
}

impl<T: CatalogEntity> EntityDescriptor for CollectionDescriptor<T> {
    fn entity_type(&self) -> &str {
        T::resource_name_singular()
    }

    fn plural(&self) -> &str {
        T::resource_name()
    }

    fn build_routes(&self) -> Router {
        collections::routes(self.collection.clone())
    }
}

/// Registry for all catalog collections in the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: HashMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Register an entity descriptor
    ///
    /// The entity type name is used as the key; a second registration for
    /// the same type replaces the first.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge the routes of every registered entity into one router
    pub fn build_routes(&self) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            router = router.merge(descriptor.build_routes());
        }

        router
    }

    /// Registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.descriptors.keys().map(|s| s.as_str()).collect();
        types.sort_unstable();
        types
    }

    /// Plural route prefixes, sorted
    pub fn plurals(&self) -> Vec<&str> {
        let mut plurals: Vec<&str> = self.descriptors.values().map(|d| d.plural()).collect();
        plurals.sort_unstable();
        plurals
    }
}
