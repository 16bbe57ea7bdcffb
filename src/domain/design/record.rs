//! Design records.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignStatus {
    /// Still being iterated on with the user.
    Refining,
    /// Accepted by the user; eligible for product configuration.
    Approved,
}

/// One generated design.
///
/// Records are superseded, never mutated: each revision produces a new
/// record whose `original_prompt` is carried forward unchanged, forming
/// an append-only prompt lineage terminated by approval. Keeping the
/// full current prompt on every record allows resuming from any
/// historical prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRecord {
    /// Hosted URL of the generated image.
    pub image_url: String,
    /// Best-effort analysis of the image; absent when analysis failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    /// The prompt of the first generation in this lineage.
    pub original_prompt: String,
    /// The prompt that produced this record's image.
    pub current_prompt: String,
    pub status: DesignStatus,
}

impl DesignRecord {
    /// Returns a copy of this record marked approved.
    pub fn approved(&self) -> Self {
        Self {
            status: DesignStatus::Approved,
            ..self.clone()
        }
    }
}
