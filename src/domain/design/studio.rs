//! Design generation and revision.
//!
//! Wraps the image-generation capability with prompt lineage tracking.
//! Analysis of the generated image is strictly best-effort: its failure
//! is logged and the record's `analysis` field is simply absent. Image
//! generation itself failing is fatal to the calling operation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::ports::{AiError, GenerativeAi};

use super::record::{DesignRecord, DesignStatus};

/// Errors from design operations.
#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    /// Image generation failed. Carries the failed prompt's length
    /// rather than its content, to keep large payloads out of logs.
    #[error("image generation failed for a {prompt_len}-character prompt: {source}")]
    Generation {
        prompt_len: usize,
        #[source]
        source: AiError,
    },
}

/// Generates and revises designs, maintaining prompt lineage.
pub struct DesignStudio {
    ai: Arc<dyn GenerativeAi>,
}

impl DesignStudio {
    pub fn new(ai: Arc<dyn GenerativeAi>) -> Self {
        Self { ai }
    }

    /// Generates a fresh design from a prompt, starting a new lineage.
    pub async fn generate(&self, prompt: &str) -> Result<DesignRecord, DesignError> {
        info!(prompt_len = prompt.len(), "generating design");

        let image_url =
            self.ai
                .generate_image(prompt)
                .await
                .map_err(|source| DesignError::Generation {
                    prompt_len: prompt.len(),
                    source,
                })?;

        let analysis = self.analyze(&image_url).await;

        Ok(DesignRecord {
            image_url,
            analysis,
            original_prompt: prompt.to_string(),
            current_prompt: prompt.to_string(),
            status: DesignStatus::Refining,
        })
    }

    /// Revises an existing design from user feedback.
    ///
    /// The previous record is superseded, not mutated: the new record
    /// carries the lineage's `original_prompt` forward unchanged and a
    /// current prompt built from the previous one plus the feedback.
    pub async fn revise(
        &self,
        previous: &DesignRecord,
        feedback: &str,
    ) -> Result<DesignRecord, DesignError> {
        let prompt = revision_prompt(&previous.current_prompt, feedback);
        info!(prompt_len = prompt.len(), "revising design");

        let image_url =
            self.ai
                .generate_image(&prompt)
                .await
                .map_err(|source| DesignError::Generation {
                    prompt_len: prompt.len(),
                    source,
                })?;

        let analysis = self.analyze(&image_url).await;

        Ok(DesignRecord {
            image_url,
            analysis,
            original_prompt: previous.original_prompt.clone(),
            current_prompt: prompt,
            status: DesignStatus::Refining,
        })
    }

    async fn analyze(&self, image_url: &str) -> Option<String> {
        match self.ai.analyze_image(image_url).await {
            Ok(text) => Some(text),
            Err(error) => {
                warn!(%error, "image analysis failed, continuing without");
                None
            }
        }
    }
}

/// Builds the revision prompt from the previous prompt and the feedback.
fn revision_prompt(previous_prompt: &str, feedback: &str) -> String {
    format!(
        "Original design was: {previous_prompt}. Modifications requested: {feedback}. \
         Keep the core elements of the original design while applying the requested changes."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockGenerativeAi;

    fn studio(mock: MockGenerativeAi) -> DesignStudio {
        DesignStudio::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn generate_starts_a_lineage() {
        let mock = MockGenerativeAi::new()
            .with_image_url("https://images.test/one.png")
            .with_analysis("Bold outlines, prints well.");

        let record = studio(mock).generate("a cartoonish beagle").await.unwrap();

        assert_eq!(record.image_url, "https://images.test/one.png");
        assert_eq!(record.original_prompt, "a cartoonish beagle");
        assert_eq!(record.current_prompt, "a cartoonish beagle");
        assert_eq!(record.status, DesignStatus::Refining);
        assert_eq!(record.analysis.as_deref(), Some("Bold outlines, prints well."));
    }

    #[tokio::test]
    async fn analysis_failure_does_not_fail_generation() {
        let mock = MockGenerativeAi::new()
            .with_image_url("https://images.test/one.png")
            .with_analysis_error(AiError::unavailable("vision backend down"));

        let record = studio(mock).generate("a mountain sunrise").await.unwrap();

        assert!(record.analysis.is_none());
        assert_eq!(record.image_url, "https://images.test/one.png");
    }

    #[tokio::test]
    async fn generation_failure_reports_prompt_length_only() {
        let mock = MockGenerativeAi::new().with_image_error(AiError::unavailable("no capacity"));

        let prompt = "a very detailed scene";
        let err = studio(mock).generate(prompt).await.unwrap_err();

        let DesignError::Generation { prompt_len, .. } = err;
        assert_eq!(prompt_len, prompt.len());
    }

    #[tokio::test]
    async fn revise_supersedes_without_mutating() {
        let mock = MockGenerativeAi::new()
            .with_image_url("https://images.test/one.png")
            .with_image_url("https://images.test/two.png");
        let studio = studio(mock);

        let first = studio.generate("a cartoonish beagle").await.unwrap();
        let second = studio.revise(&first, "add sunglasses").await.unwrap();

        // Previous record untouched.
        assert_eq!(first.current_prompt, "a cartoonish beagle");
        // Lineage head carries the original prompt forward.
        assert_eq!(second.original_prompt, "a cartoonish beagle");
        assert!(second.current_prompt.contains("a cartoonish beagle"));
        assert!(second.current_prompt.contains("add sunglasses"));
        assert_eq!(second.status, DesignStatus::Refining);
    }

    #[tokio::test]
    async fn original_prompt_survives_many_revisions() {
        let studio = studio(MockGenerativeAi::new());

        let mut record = studio.generate("a cartoonish beagle").await.unwrap();
        for feedback in ["bigger ears", "add a bone", "pastel colors"] {
            record = studio.revise(&record, feedback).await.unwrap();
        }

        assert_eq!(record.original_prompt, "a cartoonish beagle");
    }

    #[test]
    fn revision_prompt_is_deterministic() {
        let a = revision_prompt("a beagle", "add sunglasses");
        let b = revision_prompt("a beagle", "add sunglasses");
        assert_eq!(a, b);
        assert!(a.starts_with("Original design was: a beagle."));
        assert!(a.contains("Modifications requested: add sunglasses."));
    }
}
