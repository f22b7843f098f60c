//! Product and category types.

use crate::ids::ProductId;
use crate::price::Price;
use serde::{Deserialize, Serialize};

/// Storefront category tag.
///
/// The backend sends the Russian tag text; the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "софт-скил")]
    SoftSkill,
    #[serde(rename = "хард-скил")]
    HardSkill,
    #[serde(rename = "дополнительное")]
    Additional,
    #[serde(rename = "кнопка")]
    Button,
    #[serde(rename = "другое")]
    Other,
}

impl Category {
    /// Short ASCII slug for presentation (badge colour, CSS modifier).
    pub fn slug(&self) -> &'static str {
        match self {
            Category::SoftSkill => "soft",
            Category::HardSkill => "hard",
            Category::Additional => "additional",
            Category::Button => "button",
            Category::Other => "other",
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Category tag.
    pub category: Category,
    /// Image path relative to the content CDN.
    #[serde(default)]
    pub image: String,
    /// Price, or priceless.
    #[serde(default)]
    pub price: Price,
}

impl Product {
    /// Create a product with an empty description and image.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        category: Category,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category,
            image: String::new(),
            price,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the image path.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Check if the product can be added to the basket.
    pub fn is_purchasable(&self) -> bool {
        self.price.is_purchasable()
    }

    /// Resolve the image path against a CDN base URL.
    pub fn image_url(&self, cdn_base: &str) -> String {
        if self.image.starts_with("http://") || self.image.starts_with("https://") {
            return self.image.clone();
        }
        format!(
            "{}/{}",
            cdn_base.trim_end_matches('/'),
            self.image.trim_start_matches('/')
        )
    }
}

/// Product list as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductList {
    /// Total number of products the backend reports.
    pub total: usize,
    /// The products.
    pub items: Vec<Product>,
}
