//! Generative AI adapters.

mod mock;
mod openai;

pub use mock::{MockGenerativeAi, RecordedCall};
pub use openai::{OpenAiClient, OpenAiConfig};
