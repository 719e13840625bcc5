//! Core module containing fundamental traits and types for the storefront

pub mod entity;
pub mod error;
pub mod extractors;
pub mod field;
pub mod service;

pub use entity::{Data, Entity, Orderable};
pub use error::{
    ConfigError, CourierError, EntityError, ErrorResponse, OrderError, RequestError, ShopError,
    ShopResult, StorageError, ValidationError,
};
pub use extractors::{EntityId, JsonBody, ValidJson};
pub use field::{FieldValue, ToFieldValue};
pub use service::DataService;
