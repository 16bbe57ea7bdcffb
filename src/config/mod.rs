//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `MERCH_FORGE` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use merch_forge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod printify;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use printify::PrintifyConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Commerce configuration (Printify)
    #[serde(default)]
    pub printify: PrintifyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `MERCH_FORGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MERCH_FORGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MERCH_FORGE__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MERCH_FORGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.printify.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn valid_config() -> AppConfig {
        AppConfig {
            ai: AiConfig {
                openai_api_key: Some(Secret::new("sk-test".to_string())),
                ..Default::default()
            },
            printify: PrintifyConfig {
                api_token: Some(Secret::new("token".to_string())),
                shop_id: Some("shop-1".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn default_config_fails_validation() {
        // Required credentials are absent by default.
        assert!(AppConfig::default().validate().is_err());
    }

    #[test]
    fn complete_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validation_reports_the_first_missing_section() {
        let mut config = valid_config();
        config.ai.openai_api_key = None;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn default_config_is_development() {
        assert!(!AppConfig::default().is_production());
    }
}
