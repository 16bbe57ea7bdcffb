//! Printify implementation of the commerce port.
//!
//! Bearer-token authenticated client for the Printify v1 API. Catalog
//! operations are global; uploads, product creation, and publishing are
//! scoped to the configured shop.

use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::catalog::{CatalogEntry, CatalogVariant};
use crate::ports::{
    Commerce, CommerceError, CreatedProduct, PrintProvider, ProductDraft, UploadedAsset,
};

/// Configuration for the Printify client.
#[derive(Debug, Clone)]
pub struct PrintifyApiConfig {
    api_token: Secret<String>,
    /// Shop all mutating operations are scoped to.
    pub shop_id: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl PrintifyApiConfig {
    /// Creates a configuration with the given token and shop.
    pub fn new(api_token: impl Into<String>, shop_id: impl Into<String>) -> Self {
        Self {
            api_token: Secret::new(api_token.into()),
            shop_id: shop_id.into(),
            base_url: "https://api.printify.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

/// Printify-backed commerce client.
pub struct PrintifyClient {
    config: PrintifyApiConfig,
    client: Client,
}

impl PrintifyClient {
    pub fn new(config: PrintifyApiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CommerceError> {
        let response = self
            .client
            .get(format!("{}{}", self.config.base_url, path))
            .bearer_auth(self.config.api_token())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = self.check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| CommerceError::parse(e.to_string()))
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, CommerceError> {
        let response = self
            .client
            .post(format!("{}{}", self.config.base_url, path))
            .bearer_auth(self.config.api_token())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = self.check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| CommerceError::parse(e.to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> CommerceError {
        if error.is_timeout() {
            CommerceError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if error.is_connect() {
            CommerceError::network(format!("Connection failed: {error}"))
        } else {
            CommerceError::network(error.to_string())
        }
    }

    async fn check_status(&self, response: Response) -> Result<Response, CommerceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Printify request rejected");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(CommerceError::AuthenticationFailed)
            }
            s if s.is_server_error() => Err(CommerceError::unavailable(format!(
                "server error {status}: {body}"
            ))),
            _ => Err(CommerceError::api(status.as_u16(), body)),
        }
    }

    fn shop_path(&self, suffix: &str) -> String {
        format!("/shops/{}{}", self.config.shop_id, suffix)
    }
}

#[async_trait]
impl Commerce for PrintifyClient {
    async fn get_blueprints(&self) -> Result<Vec<CatalogEntry>, CommerceError> {
        self.get_json("/catalog/blueprints.json").await
    }

    async fn get_print_providers(
        &self,
        blueprint_id: u64,
    ) -> Result<Vec<PrintProvider>, CommerceError> {
        self.get_json(&format!(
            "/catalog/blueprints/{blueprint_id}/print_providers.json"
        ))
        .await
    }

    async fn get_variants(
        &self,
        blueprint_id: u64,
        print_provider_id: u64,
    ) -> Result<Vec<CatalogVariant>, CommerceError> {
        let response: VariantsResponse = self
            .get_json(&format!(
                "/catalog/blueprints/{blueprint_id}/print_providers/{print_provider_id}/variants.json"
            ))
            .await?;
        Ok(response.variants)
    }

    async fn upload_image(
        &self,
        file_name: &str,
        image_url: &str,
    ) -> Result<UploadedAsset, CommerceError> {
        let body = UploadRequest {
            file_name,
            url: image_url,
        };
        self.post_json("/uploads/images.json", &body).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<CreatedProduct, CommerceError> {
        self.post_json(&self.shop_path("/products.json"), draft).await
    }

    async fn publish_product(&self, product_id: &str) -> Result<(), CommerceError> {
        let _: serde_json::Value = self
            .post_json(
                &self.shop_path(&format!("/products/{product_id}/publish.json")),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct VariantsResponse {
    #[serde(default)]
    variants: Vec<CatalogVariant>,
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file_name: &'a str,
    url: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_overrides_defaults() {
        let config = PrintifyApiConfig::new("token", "shop-1")
            .with_base_url("http://localhost:9000/v1")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.shop_id, "shop-1");
        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn shop_paths_are_scoped() {
        let client = PrintifyClient::new(PrintifyApiConfig::new("token", "shop-1"));
        assert_eq!(client.shop_path("/products.json"), "/shops/shop-1/products.json");
    }

    #[test]
    fn variants_response_tolerates_missing_list() {
        let response: VariantsResponse = serde_json::from_str(r#"{"id": 3, "title": "x"}"#).unwrap();
        assert!(response.variants.is_empty());
    }

    #[test]
    fn upload_request_uses_printify_field_names() {
        let body = UploadRequest {
            file_name: "design.png",
            url: "https://images.test/design.png",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["file_name"], "design.png");
        assert_eq!(json["url"], "https://images.test/design.png");
    }
}
