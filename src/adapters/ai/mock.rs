//! Mock generative AI for testing.
//!
//! Scripted responses are queued per capability and consumed in order.
//! When a queue runs dry, chat fails (tests should script every
//! classification), image generation falls back to a numbered URL, and
//! analysis falls back to a fixed text, so tests only script the
//! capabilities they care about.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::conversation::ChatMessage;
use crate::ports::{AiError, GenerativeAi};

const DEFAULT_ANALYSIS: &str = "The design is clear and should print well.";

/// A recorded capability invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Chat { message_count: usize },
    Image { prompt: String },
    Analyze { image_url: String },
}

/// Configurable mock implementation of [`GenerativeAi`].
#[derive(Default)]
pub struct MockGenerativeAi {
    chat: Arc<Mutex<VecDeque<Result<String, AiError>>>>,
    images: Arc<Mutex<VecDeque<Result<String, AiError>>>>,
    analyses: Arc<Mutex<VecDeque<Result<String, AiError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    image_counter: AtomicU64,
}

impl MockGenerativeAi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a chat completion.
    pub fn with_chat_response(self, content: impl Into<String>) -> Self {
        self.chat.lock().unwrap().push_back(Ok(content.into()));
        self
    }

    /// Queues a chat failure.
    pub fn with_chat_error(self, error: AiError) -> Self {
        self.chat.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues a generated image URL.
    pub fn with_image_url(self, url: impl Into<String>) -> Self {
        self.images.lock().unwrap().push_back(Ok(url.into()));
        self
    }

    /// Queues an image generation failure.
    pub fn with_image_error(self, error: AiError) -> Self {
        self.images.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues an analysis result.
    pub fn with_analysis(self, text: impl Into<String>) -> Self {
        self.analyses.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queues an analysis failure.
    pub fn with_analysis_error(self, error: AiError) -> Self {
        self.analyses.lock().unwrap().push_back(Err(error));
        self
    }

    /// All calls made against this mock, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The prompts passed to image generation, in order.
    pub fn image_prompts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Image { prompt } => Some(prompt),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GenerativeAi for MockGenerativeAi {
    async fn generate_chat_response(&self, messages: &[ChatMessage]) -> Result<String, AiError> {
        self.record(RecordedCall::Chat {
            message_count: messages.len(),
        });
        self.chat
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::unavailable("no scripted chat response")))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, AiError> {
        self.record(RecordedCall::Image {
            prompt: prompt.to_string(),
        });
        self.images.lock().unwrap().pop_front().unwrap_or_else(|| {
            let n = self.image_counter.fetch_add(1, Ordering::Relaxed) + 1;
            Ok(format!("https://images.test/design-{n}.png"))
        })
    }

    async fn analyze_image(&self, image_url: &str) -> Result<String, AiError> {
        self.record(RecordedCall::Analyze {
            image_url: image_url.to_string(),
        });
        self.analyses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_ANALYSIS.to_string()))
    }
}
