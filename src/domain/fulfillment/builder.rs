//! Product configuration.
//!
//! Turns an approved design and a chosen catalog entry into a published
//! commerce product: resolve a print provider, resolve variants, upload
//! the design asset, create the product with a single front/centered
//! placement and the first resolved variant, then publish. The four
//! remote calls run sequentially and are not transactional; completed
//! steps are recorded in a [`SagaLog`] so callers can see how far an
//! attempt got and a future retry can resume.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::catalog::CatalogEntry;
use crate::ports::{
    Commerce, CommerceError, PlacedImage, Placeholder, PrintArea, ProductDraft,
};

use super::saga::{SagaLog, SagaStep};

const PRODUCT_TITLE: &str = "Custom Design Product";
const PRODUCT_DESCRIPTION: &str = "AI-Generated Custom Product";
const DESIGN_FILE_NAME: &str = "approved-design.png";

/// Outcome of a successful configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConfiguration {
    pub product_id: String,
    pub status: FulfillmentStatus,
    pub saga: SagaLog,
}

/// Terminal status of a configuration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStatus {
    Success,
}

/// Errors from product configuration.
///
/// Every variant carries the saga log of the attempt, so the caller can
/// tell which effects are already in place (e.g. `ProductCreated`
/// completed but `Published` did not means an unpublished product was
/// left behind).
#[derive(Debug, thiserror::Error)]
pub enum FulfillmentError {
    #[error("no print providers available for catalog entry {entry_id}")]
    NoProvider { entry_id: u64, saga: SagaLog },

    #[error("no variants available for catalog entry {entry_id} with provider {provider_id}")]
    NoVariants {
        entry_id: u64,
        provider_id: u64,
        saga: SagaLog,
    },

    #[error("product configuration failed while {}: {source}", .step.describes())]
    Configuration {
        step: SagaStep,
        saga: SagaLog,
        #[source]
        source: CommerceError,
    },
}

impl FulfillmentError {
    /// The saga log of the failed attempt.
    pub fn saga(&self) -> &SagaLog {
        match self {
            Self::NoProvider { saga, .. }
            | Self::NoVariants { saga, .. }
            | Self::Configuration { saga, .. } => saga,
        }
    }
}

/// Builds and publishes commerce products from approved designs.
pub struct ConfigurationBuilder {
    commerce: Arc<dyn Commerce>,
    /// Canonical provider to prefer when it serves the entry.
    default_provider_id: Option<u64>,
}

impl ConfigurationBuilder {
    pub fn new(commerce: Arc<dyn Commerce>, default_provider_id: Option<u64>) -> Self {
        Self {
            commerce,
            default_provider_id,
        }
    }

    /// Configures and publishes a product for the selected entry and the
    /// approved design's image URL.
    pub async fn configure(
        &self,
        entry: &CatalogEntry,
        design_url: &str,
    ) -> Result<ProductConfiguration, FulfillmentError> {
        info!(entry_id = entry.id, "configuring product");
        let mut saga = SagaLog::new();

        let providers = self
            .commerce
            .get_print_providers(entry.id)
            .await
            .map_err(|source| self.failed(SagaStep::ProviderResolved, &saga, source))?;
        let provider = providers
            .iter()
            .find(|p| Some(p.id) == self.default_provider_id)
            .or_else(|| providers.first())
            .ok_or_else(|| FulfillmentError::NoProvider {
                entry_id: entry.id,
                saga: saga.clone(),
            })?;
        let provider_id = provider.id;
        saga.record(SagaStep::ProviderResolved);

        let variants = self
            .commerce
            .get_variants(entry.id, provider_id)
            .await
            .map_err(|source| self.failed(SagaStep::VariantsResolved, &saga, source))?;
        let variant = variants.first().ok_or_else(|| FulfillmentError::NoVariants {
            entry_id: entry.id,
            provider_id,
            saga: saga.clone(),
        })?;
        let variant_id = variant.id;
        saga.record(SagaStep::VariantsResolved);

        let asset = self
            .commerce
            .upload_image(DESIGN_FILE_NAME, design_url)
            .await
            .map_err(|source| self.failed(SagaStep::AssetUploaded, &saga, source))?;
        saga.record(SagaStep::AssetUploaded);

        let draft = build_draft(entry, provider_id, variant_id, &asset.id);
        let created = self
            .commerce
            .create_product(&draft)
            .await
            .map_err(|source| self.failed(SagaStep::ProductCreated, &saga, source))?;
        saga.record(SagaStep::ProductCreated);

        self.commerce
            .publish_product(&created.id)
            .await
            .map_err(|source| self.failed(SagaStep::Published, &saga, source))?;
        saga.record(SagaStep::Published);

        info!(product_id = %created.id, "product published");
        Ok(ProductConfiguration {
            product_id: created.id,
            status: FulfillmentStatus::Success,
            saga,
        })
    }

    fn failed(&self, step: SagaStep, saga: &SagaLog, source: CommerceError) -> FulfillmentError {
        FulfillmentError::Configuration {
            step,
            saga: saga.clone(),
            source,
        }
    }
}

/// One default placement: front, centered, unscaled, unrotated, with the
/// first resolved variant.
fn build_draft(
    entry: &CatalogEntry,
    provider_id: u64,
    variant_id: u64,
    asset_id: &str,
) -> ProductDraft {
    ProductDraft {
        blueprint_id: entry.id,
        print_provider_id: provider_id,
        title: PRODUCT_TITLE.to_string(),
        description: PRODUCT_DESCRIPTION.to_string(),
        variant_ids: vec![variant_id],
        print_areas: vec![PrintArea {
            variant_ids: vec![variant_id],
            placeholders: vec![Placeholder {
                position: "front".to_string(),
                images: vec![PlacedImage::centered(asset_id)],
            }],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::commerce::{FailurePoint, InMemoryCommerce};
    use crate::domain::catalog::CatalogVariant;
    use crate::ports::PrintProvider;

    const DESIGN_URL: &str = "https://images.test/approved.png";

    fn entry() -> CatalogEntry {
        CatalogEntry::new(5, "Classic T-Shirt")
    }

    fn commerce_with_stock() -> InMemoryCommerce {
        InMemoryCommerce::new()
            .with_providers(
                5,
                vec![
                    PrintProvider {
                        id: 3,
                        title: "FastPrint".to_string(),
                    },
                    PrintProvider {
                        id: 29,
                        title: "CanonicalPrint".to_string(),
                    },
                ],
            )
            .with_variants(5, 29, vec![CatalogVariant::new(17, "Black / M", 1999)])
            .with_variants(5, 3, vec![CatalogVariant::new(41, "White / M", 1899)])
    }

    fn builder(commerce: InMemoryCommerce, default_provider: Option<u64>) -> ConfigurationBuilder {
        ConfigurationBuilder::new(Arc::new(commerce), default_provider)
    }

    #[tokio::test]
    async fn happy_path_completes_all_steps() {
        let commerce = commerce_with_stock();
        let created = commerce.created_drafts();
        let published = commerce.published_ids();

        let config = builder(commerce, Some(29))
            .configure(&entry(), DESIGN_URL)
            .await
            .unwrap();

        assert_eq!(config.status, FulfillmentStatus::Success);
        assert!(config.saga.is_complete());
        assert_eq!(created.lock().unwrap().len(), 1);
        assert_eq!(published.lock().unwrap().as_slice(), [config.product_id]);
    }

    #[tokio::test]
    async fn prefers_the_default_provider() {
        let commerce = commerce_with_stock();
        let created = commerce.created_drafts();

        builder(commerce, Some(29))
            .configure(&entry(), DESIGN_URL)
            .await
            .unwrap();

        let drafts = created.lock().unwrap();
        assert_eq!(drafts[0].print_provider_id, 29);
        assert_eq!(drafts[0].variant_ids, vec![17]);
    }

    #[tokio::test]
    async fn falls_back_to_first_provider_without_default() {
        let commerce = commerce_with_stock();
        let created = commerce.created_drafts();

        builder(commerce, None)
            .configure(&entry(), DESIGN_URL)
            .await
            .unwrap();

        assert_eq!(created.lock().unwrap()[0].print_provider_id, 3);
    }

    #[tokio::test]
    async fn no_providers_fails_before_any_step() {
        let err = builder(InMemoryCommerce::new(), None)
            .configure(&entry(), DESIGN_URL)
            .await
            .unwrap_err();

        assert!(matches!(err, FulfillmentError::NoProvider { entry_id: 5, .. }));
        assert!(err.saga().outcomes().is_empty());
    }

    #[tokio::test]
    async fn no_variants_fails_after_provider_resolution() {
        let commerce = InMemoryCommerce::new().with_providers(
            5,
            vec![PrintProvider {
                id: 3,
                title: "FastPrint".to_string(),
            }],
        );

        let err = builder(commerce, None)
            .configure(&entry(), DESIGN_URL)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FulfillmentError::NoVariants {
                entry_id: 5,
                provider_id: 3,
                ..
            }
        ));
        assert_eq!(err.saga().last_completed(), Some(SagaStep::ProviderResolved));
    }

    #[tokio::test]
    async fn publish_failure_records_the_created_product() {
        let commerce = commerce_with_stock().failing_at(FailurePoint::Publish);
        let created = commerce.created_drafts();

        let err = builder(commerce, Some(29))
            .configure(&entry(), DESIGN_URL)
            .await
            .unwrap_err();

        // The product was created but never published; the saga shows it.
        assert!(matches!(
            err,
            FulfillmentError::Configuration {
                step: SagaStep::Published,
                ..
            }
        ));
        assert!(err.saga().is_completed(SagaStep::ProductCreated));
        assert!(!err.saga().is_completed(SagaStep::Published));
        assert_eq!(created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upload_failure_stops_before_product_creation() {
        let commerce = commerce_with_stock().failing_at(FailurePoint::Upload);
        let created = commerce.created_drafts();

        let err = builder(commerce, Some(29))
            .configure(&entry(), DESIGN_URL)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FulfillmentError::Configuration {
                step: SagaStep::AssetUploaded,
                ..
            }
        ));
        assert!(created.lock().unwrap().is_empty());
    }
}
