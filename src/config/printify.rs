//! Printify commerce configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Printify commerce configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyConfig {
    /// API token
    pub api_token: Option<Secret<String>>,

    /// Shop id all mutating operations are scoped to
    pub shop_id: Option<String>,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Canonical print provider to prefer when it serves an entry
    pub default_print_provider_id: Option<u64>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl PrintifyConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API token is configured
    pub fn has_token(&self) -> bool {
        self.api_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }

    /// Validate Printify configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_token() {
            return Err(ValidationError::MissingRequired("PRINTIFY__API_TOKEN"));
        }
        if self.shop_id.as_deref().map_or(true, str::is_empty) {
            return Err(ValidationError::MissingRequired("PRINTIFY__SHOP_ID"));
        }
        Ok(())
    }
}

impl Default for PrintifyConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            shop_id: None,
            base_url: default_base_url(),
            default_print_provider_id: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.printify.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}
