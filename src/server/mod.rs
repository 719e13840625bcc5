//! Server module for building the storefront HTTP server
//!
//! The [`ServerBuilder`] registers:
//! - ordered CRUD routes for every catalog collection
//! - order and courier tracking routes
//! - health routes

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use entity_registry::{CollectionDescriptor, EntityDescriptor, EntityRegistry};
pub use exposure::RestExposure;
pub use host::ServerHost;
