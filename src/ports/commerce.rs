//! Commerce Port - interface to the print-on-demand catalog and shop.
//!
//! Covers the six remote operations the domain needs: catalog listing,
//! print-provider lookup, variant lookup, design-asset upload, product
//! creation, and publishing. Implementations translate these to the
//! commerce backend's HTTP API; the domain treats the backend as a black
//! box and never encodes its business rules.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CatalogEntry, CatalogVariant};

/// Port for commerce backend interactions.
#[async_trait]
pub trait Commerce: Send + Sync {
    /// Fetches the full catalog snapshot.
    async fn get_blueprints(&self) -> Result<Vec<CatalogEntry>, CommerceError>;

    /// Lists print providers able to produce a catalog entry.
    async fn get_print_providers(&self, blueprint_id: u64)
        -> Result<Vec<PrintProvider>, CommerceError>;

    /// Lists sellable variants for a (catalog entry, provider) pair.
    async fn get_variants(
        &self,
        blueprint_id: u64,
        print_provider_id: u64,
    ) -> Result<Vec<CatalogVariant>, CommerceError>;

    /// Uploads an externally hosted image into the backend's asset store.
    async fn upload_image(
        &self,
        file_name: &str,
        image_url: &str,
    ) -> Result<UploadedAsset, CommerceError>;

    /// Creates a draft product in the shop.
    async fn create_product(&self, draft: &ProductDraft) -> Result<CreatedProduct, CommerceError>;

    /// Publishes a previously created product.
    async fn publish_product(&self, product_id: &str) -> Result<(), CommerceError>;
}

/// A print provider able to produce a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintProvider {
    pub id: u64,
    pub title: String,
}

/// Handle to an image uploaded into the commerce asset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// Payload for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub blueprint_id: u64,
    pub print_provider_id: u64,
    pub title: String,
    pub description: String,
    pub variant_ids: Vec<u64>,
    pub print_areas: Vec<PrintArea>,
}

/// A print area binding placed artwork to a set of variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintArea {
    pub variant_ids: Vec<u64>,
    pub placeholders: Vec<Placeholder>,
}

/// One artwork placement slot (e.g. "front").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub position: String,
    pub images: Vec<PlacedImage>,
}

/// An uploaded asset positioned within a placeholder.
///
/// Coordinates are fractional: x = y = 0.5 centers the image; scale 1.0
/// and angle 0.0 leave it unscaled and unrotated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub angle: f32,
}

impl PlacedImage {
    /// Centers an asset at natural size with no rotation.
    pub fn centered(asset_id: impl Into<String>) -> Self {
        Self {
            id: asset_id.into(),
            x: 0.5,
            y: 0.5,
            scale: 1.0,
            angle: 0.0,
        }
    }
}

/// Result of creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedProduct {
    pub id: String,
}

/// Commerce backend transport and protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum CommerceError {
    /// Backend rejected the request.
    #[error("commerce API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// API token or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Backend is unavailable.
    #[error("commerce backend unavailable: {message}")]
    Unavailable { message: String },

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the backend response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl CommerceError {
    /// Creates an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
