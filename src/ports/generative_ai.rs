//! Generative AI Port - interface to the chat/image capability.
//!
//! Abstracts all interactions with the generative backend so the domain
//! never couples to a specific vendor. Three narrow operations:
//!
//! - chat completion over a message list, returning JSON text when the
//!   prompt asks for classification;
//! - text-to-image generation, returning a hosted image URL;
//! - image analysis, returning free text (callers treat failure here as
//!   non-fatal).

use async_trait::async_trait;

use crate::domain::conversation::ChatMessage;

/// Port for generative AI interactions.
///
/// Implementations connect to an external AI service and translate
/// between the provider API and domain types.
#[async_trait]
pub trait GenerativeAi: Send + Sync {
    /// Generates a chat completion over the given messages.
    ///
    /// When the leading message instructs the model to answer in JSON,
    /// the returned text is expected (but not guaranteed) to be valid
    /// JSON; callers own the parse and its failure handling.
    async fn generate_chat_response(&self, messages: &[ChatMessage]) -> Result<String, AiError>;

    /// Generates an image from a text prompt and returns its URL.
    async fn generate_image(&self, prompt: &str) -> Result<String, AiError>;

    /// Analyzes a hosted image and returns descriptive text.
    async fn analyze_image(&self, image_url: &str) -> Result<String, AiError>;
}

/// Generative AI transport and protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl AiError {
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

    /// Returns true if retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Unavailable { .. } | Self::Network(_) | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_build_expected_variants() {
        assert!(matches!(
            AiError::unavailable("down"),
            AiError::Unavailable { .. }
        ));
        assert!(matches!(AiError::network("refused"), AiError::Network(_)));
        assert!(matches!(AiError::parse("bad json"), AiError::Parse(_)));
    }

    #[test]
    fn retryable_classification() {
        assert!(AiError::RateLimited { retry_after_secs: 5 }.is_retryable());
        assert!(AiError::unavailable("down").is_retryable());
        assert!(AiError::network("reset").is_retryable());
        assert!(AiError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!AiError::AuthenticationFailed.is_retryable());
        assert!(!AiError::parse("bad json").is_retryable());
        assert!(!AiError::InvalidRequest("bad model".into()).is_retryable());
    }

    #[test]
    fn displays_carry_context() {
        assert_eq!(
            AiError::RateLimited { retry_after_secs: 30 }.to_string(),
            "rate limited: retry after 30s"
        );
        assert_eq!(
            AiError::Timeout { timeout_secs: 60 }.to_string(),
            "request timed out after 60s"
        );
    }
}
