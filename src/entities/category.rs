//! Catalog category

use super::{CatalogEntity, default_active, validate_slug};
use serde::Deserialize;
use validator::Validate;

impl_orderable_entity!(Category, "category", "categories", ["name", "slug"], {
    slug: String,
    image: Option<String>,
});

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryPatch {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
}

impl CatalogEntity for Category {
    type Create = CreateCategory;
    type Patch = CategoryPatch;

    fn from_create(input: CreateCategory) -> Self {
        let mut category = Category::new(input.name, input.slug, input.image);
        category.is_active = input.is_active;
        category
    }

    fn apply_patch(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
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
