//! Domain entities: the three orderable catalog collections and purchase orders

#[macro_use]
pub mod macros;

pub mod category;
pub mod order;
pub mod product;
pub mod slider;

pub use category::{Category, CategoryPatch, CreateCategory};
pub use order::{
    CourierInfo, CreateOrder, CreateOrderItem, Order, OrderItem, OrderStatus, StatusChange,
};
pub use product::{CreateProduct, Product, ProductPatch};
pub use slider::{CreateSlider, Slider, SliderPatch};

use crate::core::entity::Orderable;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An orderable entity that can be created and patched over REST.
///
/// The create and patch payloads never carry `order`: positions are only
/// ever assigned by the [`OrderedCollection`](crate::ordering::OrderedCollection).
pub trait CatalogEntity: Orderable + Serialize + DeserializeOwned {
    /// Payload accepted by `POST /{plural}`
    type Create: DeserializeOwned + Validate + Send + 'static;

    /// Payload accepted by `PUT /{plural}/{id}`
    type Patch: DeserializeOwned + Validate + Send + 'static;

    /// Build a fresh record; its position is assigned on insert
    fn from_create(input: Self::Create) -> Self;

    /// Apply the present fields of a patch and touch `updated_at`
    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Create body with an optional desired position next to the entity fields
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequest<C> {
    #[serde(flatten)]
    pub fields: C,
    #[serde(default)]
    pub order: Option<i64>,
}

/// Patch body with an optional reposition next to the entity fields
#[derive(Debug, Clone, Deserialize)]
pub struct PatchRequest<P> {
    #[serde(flatten)]
    pub fields: P,
    #[serde(default)]
    pub order: Option<i64>,
}

/// Body of `PUT /{plural}/{id}/position`
#[derive(Debug, Clone, Deserialize)]
pub struct PositionRequest {
    pub order: i64,
}

pub(crate) fn default_active() -> bool {
    true
}

pub(crate) fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    if crate::core::field::slug_regex().is_match(slug) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("slug");
        err.message = Some("must be lowercase words separated by single dashes".into());
        Err(err)
    }
}
