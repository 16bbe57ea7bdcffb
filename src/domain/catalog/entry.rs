//! Catalog entry value objects.
//!
//! Entries are sourced verbatim from the commerce capability. The domain
//! never mutates them; it only scores and orders copies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A purchasable product template from the commerce catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique within a catalog snapshot.
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Preview image URLs, in display order.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub variants: Vec<CatalogVariant>,
}

/// One sellable variant of a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogVariant {
    pub id: u64,
    pub title: String,
    /// Price in cents.
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub is_enabled: bool,
    /// Attribute map (e.g. "color", "material", "size").
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl CatalogEntry {
    /// Creates a minimal entry, mostly useful in tests.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            brand: None,
            model: None,
            images: Vec::new(),
            variants: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a preview image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    /// Adds a variant.
    pub fn with_variant(mut self, variant: CatalogVariant) -> Self {
        self.variants.push(variant);
        self
    }
}

impl CatalogVariant {
    /// Creates an enabled variant with no attributes.
    pub fn new(id: u64, title: impl Into<String>, price: u32) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            is_enabled: true,
            options: HashMap::new(),
        }
    }

    /// Sets an attribute on the variant's option map.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}
