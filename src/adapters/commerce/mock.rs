//! In-memory commerce backend for testing.
//!
//! Catalog, providers, and variants are configured up front; created
//! drafts and published ids are recorded for assertions; any single
//! operation can be made to fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::catalog::{CatalogEntry, CatalogVariant};
use crate::ports::{
    Commerce, CommerceError, CreatedProduct, PrintProvider, ProductDraft, UploadedAsset,
};

/// Which operation should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    Blueprints,
    Providers,
    Variants,
    Upload,
    Create,
    Publish,
}

/// Configurable in-memory implementation of [`Commerce`].
#[derive(Default)]
pub struct InMemoryCommerce {
    catalog: Arc<Mutex<Vec<CatalogEntry>>>,
    providers: Arc<Mutex<HashMap<u64, Vec<PrintProvider>>>>,
    variants: Arc<Mutex<HashMap<(u64, u64), Vec<CatalogVariant>>>>,
    failure: Arc<Mutex<Option<FailurePoint>>>,
    uploads: Arc<Mutex<Vec<(String, String)>>>,
    created: Arc<Mutex<Vec<ProductDraft>>>,
    published: Arc<Mutex<Vec<String>>>,
    counter: AtomicU64,
}

impl InMemoryCommerce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the catalog snapshot.
    pub fn with_catalog(self, entries: Vec<CatalogEntry>) -> Self {
        *self.catalog.lock().unwrap() = entries;
        self
    }

    /// Sets the providers for a catalog entry.
    pub fn with_providers(self, blueprint_id: u64, providers: Vec<PrintProvider>) -> Self {
        self.providers.lock().unwrap().insert(blueprint_id, providers);
        self
    }

    /// Sets the variants for a (catalog entry, provider) pair.
    pub fn with_variants(
        self,
        blueprint_id: u64,
        print_provider_id: u64,
        variants: Vec<CatalogVariant>,
    ) -> Self {
        self.variants
            .lock()
            .unwrap()
            .insert((blueprint_id, print_provider_id), variants);
        self
    }

    /// Makes one operation fail with an injected error.
    pub fn failing_at(self, point: FailurePoint) -> Self {
        *self.failure.lock().unwrap() = Some(point);
        self
    }

    /// Handle to the drafts passed to `create_product`.
    pub fn created_drafts(&self) -> Arc<Mutex<Vec<ProductDraft>>> {
        self.created.clone()
    }

    /// Handle to the ids passed to `publish_product`.
    pub fn published_ids(&self) -> Arc<Mutex<Vec<String>>> {
        self.published.clone()
    }

    /// Handle to the (file name, url) pairs passed to `upload_image`.
    pub fn uploaded_images(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        self.uploads.clone()
    }

    fn check(&self, point: FailurePoint) -> Result<(), CommerceError> {
        if *self.failure.lock().unwrap() == Some(point) {
            return Err(CommerceError::unavailable("injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl Commerce for InMemoryCommerce {
    async fn get_blueprints(&self) -> Result<Vec<CatalogEntry>, CommerceError> {
        self.check(FailurePoint::Blueprints)?;
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn get_print_providers(
        &self,
        blueprint_id: u64,
    ) -> Result<Vec<PrintProvider>, CommerceError> {
        self.check(FailurePoint::Providers)?;
        Ok(self
            .providers
            .lock()
            .unwrap()
            .get(&blueprint_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_variants(
        &self,
        blueprint_id: u64,
        print_provider_id: u64,
    ) -> Result<Vec<CatalogVariant>, CommerceError> {
        self.check(FailurePoint::Variants)?;
        Ok(self
            .variants
            .lock()
            .unwrap()
            .get(&(blueprint_id, print_provider_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_image(
        &self,
        file_name: &str,
        image_url: &str,
    ) -> Result<UploadedAsset, CommerceError> {
        self.check(FailurePoint::Upload)?;
        self.uploads
            .lock()
            .unwrap()
            .push((file_name.to_string(), image_url.to_string()));
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(UploadedAsset {
            id: format!("asset-{n}"),
            preview_url: Some(image_url.to_string()),
        })
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<CreatedProduct, CommerceError> {
        self.check(FailurePoint::Create)?;
        self.created.lock().unwrap().push(draft.clone());
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(CreatedProduct {
            id: format!("product-{n}"),
        })
    }

    async fn publish_product(&self, product_id: &str) -> Result<(), CommerceError> {
        self.check(FailurePoint::Publish)?;
        self.published.lock().unwrap().push(product_id.to_string());
        Ok(())
    }
}
