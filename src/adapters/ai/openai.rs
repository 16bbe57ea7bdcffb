//! OpenAI implementation of the generative AI port.
//!
//! Chat classification goes through chat completions with the JSON
//! response format, image generation through the images endpoint
//! (1024×1024, one image), and image analysis through a vision-capable
//! chat completion over the hosted image URL.

use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::conversation::{ChatMessage, MessageRole};
use crate::ports::{AiError, GenerativeAi};

const ANALYSIS_INSTRUCTION: &str =
    "Analyze this image and suggest any needed improvements for product printing:";

/// Configuration for the OpenAI client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    api_key: Secret<String>,
    /// Chat/vision model.
    pub chat_model: String,
    /// Text-to-image model.
    pub image_model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a configuration with the given API key and defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            chat_model: "gpt-4o".to_string(),
            image_model: "dall-e-3".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the chat model.
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Sets the image model.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
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

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-backed generative AI client.
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> Result<Response, AiError> {
        let response = self
            .client
            .post(format!("{}{}", self.config.base_url, path))
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    AiError::network(format!("Connection failed: {e}"))
                } else {
                    AiError::network(e.to_string())
                }
            })?;

        self.check_status(response).await
    }

    async fn check_status(&self, response: Response) -> Result<Response, AiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "OpenAI request rejected");

        match status {
            StatusCode::UNAUTHORIZED => Err(AiError::AuthenticationFailed),
            StatusCode::TOO_MANY_REQUESTS => Err(AiError::RateLimited {
                retry_after_secs: 30,
            }),
            StatusCode::BAD_REQUEST => Err(AiError::InvalidRequest(body)),
            s if s.is_server_error() => {
                Err(AiError::unavailable(format!("server error {status}: {body}")))
            }
            _ => Err(AiError::network(format!("unexpected status {status}: {body}"))),
        }
    }
}

#[async_trait]
impl GenerativeAi for OpenAiClient {
    async fn generate_chat_response(&self, messages: &[ChatMessage]) -> Result<String, AiError> {
        let body = ChatCompletionRequest {
            model: self.config.chat_model.clone(),
            messages: messages.iter().map(OutboundMessage::from).collect(),
            response_format: Some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self.post("/chat/completions", &body).await?;
        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::parse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AiError::parse("no choices in completion response"))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, AiError> {
        let body = ImageGenerationRequest {
            model: self.config.image_model.clone(),
            prompt,
            n: 1,
            size: "1024x1024",
            quality: "standard",
        };

        let response = self.post("/images/generations", &body).await?;
        let generated: ImageGenerationResponse = response
            .json()
            .await
            .map_err(|e| AiError::parse(e.to_string()))?;

        generated
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| AiError::parse("no image URL in generation response"))
    }

    async fn analyze_image(&self, image_url: &str) -> Result<String, AiError> {
        let body = VisionRequest {
            model: self.config.chat_model.clone(),
            messages: vec![VisionMessage {
                role: "user",
                content: vec![
                    VisionPart::Text {
                        text: ANALYSIS_INSTRUCTION,
                    },
                    VisionPart::ImageUrl {
                        image_url: VisionImageUrl { url: image_url },
                    },
                ],
            }],
        };

        let response = self.post("/chat/completions", &body).await?;
        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::parse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AiError::parse("no choices in analysis response"))
    }
}

// ─── Wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<OutboundMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct OutboundMessage {
    role: &'static str,
    content: String,
}

impl From<&ChatMessage> for OutboundMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: match message.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            },
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: InboundMessage,
}

#[derive(Debug, Deserialize)]
struct InboundMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: String,
    prompt: &'a str,
    n: u8,
    size: &'static str,
    quality: &'static str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct VisionRequest<'a> {
    model: String,
    messages: Vec<VisionMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct VisionMessage<'a> {
    role: &'static str,
    content: Vec<VisionPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum VisionPart<'a> {
    Text { text: &'static str },
    ImageUrl { image_url: VisionImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct VisionImageUrl<'a> {
    url: &'a str,
}
