//! Homepage slider banner

use super::{CatalogEntity, default_active};
use serde::Deserialize;
use validator::Validate;

impl_orderable_entity!(Slider, "slider", "sliders", ["name"], {
    image: String,
    link: Option<String>,
    caption: Option<String>,
});

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSlider {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1))]
    pub image: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    #[validate(length(max = 240))]
    pub caption: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SliderPatch {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub image: Option<String>,
    pub link: Option<String>,
    #[validate(length(max = 240))]
    pub caption: Option<String>,
    pub is_active: Option<bool>,
}

impl CatalogEntity for Slider {
    type Create = CreateSlider;
    type Patch = SliderPatch;

    fn from_create(input: CreateSlider) -> Self {
        let mut slider = Slider::new(input.name, input.image, input.link, input.caption);
        slider.is_active = input.is_active;
        slider
    }

    fn apply_patch(&mut self, patch: SliderPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(link) = patch.link {
            self.link = Some(link);
        }
        if let Some(caption) = patch.caption {
            self.caption = Some(caption);
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        self.touch();
    }
}
