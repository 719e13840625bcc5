//! Catalog product

use super::{CatalogEntity, default_active, validate_slug};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

impl_orderable_entity!(Product, "product", "products", ["name", "slug", "category_id"], {
    slug: String,
    category_id: Option<Uuid>,
    price: f64,
    discount_price: Option<f64>,
    stock: i64,
    image: Option<String>,
});

impl Product {
    /// Price the customer pays: the discount price when it undercuts the list price
    pub fn effective_price(&self) -> f64 {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_discount"))]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub discount_price: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn validate_discount(input: &CreateProduct) -> Result<(), ValidationError> {
    match input.discount_price {
        Some(discount) if discount > input.price => {
            let mut err = ValidationError::new("discount_price");
            err.message = Some("must not exceed price".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub category_id: Option<Uuid>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub discount_price: Option<f64>,
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
}

impl CatalogEntity for Product {
    type Create = CreateProduct;
    type Patch = ProductPatch;

    fn from_create(input: CreateProduct) -> Self {
        let mut product = Product::new(
            input.name,
            input.slug,
            input.category_id,
            input.price,
            input.discount_price,
            input.stock,
            input.image,
        );
        product.is_active = input.is_active;
        product
    }

    fn apply_patch(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(discount) = patch.discount_price {
            self.discount_price = Some(discount);
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        self.touch();
    }
}
