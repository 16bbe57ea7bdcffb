//! Classification of AI output at the capability boundary.
//!
//! The orchestrator never string-matches user text. Each phase sends the
//! chat capability an instruction to answer with one JSON shape; the
//! text that comes back is parsed here, exactly once, into a typed
//! variant. Anything that fails the parse (malformed JSON, an
//! unexpected tag, missing fields) is a uniform
//! [`ClassificationFailure`], which callers recover from locally by
//! re-prompting the user. It never crashes a turn.

use serde::Deserialize;
use tracing::debug;

use crate::domain::catalog::ProductDetails;

/// Instruction for parsing an intake message into product details and
/// design content.
pub const INTENT_INSTRUCTION: &str = r#"Parse this into product details and design content. Format response as JSON:
{
  "type": "parse",
  "productDetails": {
    "type": "product type if mentioned",
    "color": "color if mentioned",
    "size": "size if mentioned",
    "material": "material if mentioned"
  },
  "designContent": "description of the design content only"
}
Omit any productDetails field that is not mentioned."#;

/// Instruction for classifying design feedback as approval or a change
/// request.
pub const FEEDBACK_INSTRUCTION: &str = r#"Determine if this message approves the design or requests changes. Respond with JSON:
{ "type": "design_feedback", "isApproved": boolean, "changes": "description of changes if any" }"#;

/// Instruction for classifying a product-selection message.
pub const SELECTION_INSTRUCTION: &str = r#"The user was shown a numbered list of products. Determine whether this message picks one of them, asks to see more options, or is unclear. Respond with JSON:
{ "type": "product_choice", "action": "select" | "more" | "unclear", "index": zero-based index of the picked product if action is "select" }"#;

/// AI classification output was not parseable into any known shape.
///
/// Recovered locally: the phase stays unchanged and the user is asked
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("AI classification output did not match any known shape")]
pub struct ClassificationFailure;

/// The classification shapes the chat capability is asked to produce.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifiedMessage {
    /// Intake: extracted product details and design content.
    Parse(ParsedIntent),
    /// Design refinement: approval or requested changes.
    DesignFeedback(DesignFeedback),
    /// Product selection: pick, more, or unclear.
    ProductChoice(SelectionIntent),
}

/// Extracted intake intent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParsedIntent {
    #[serde(default, rename = "productDetails")]
    pub product_details: ProductDetails,
    #[serde(default, rename = "designContent")]
    pub design_content: String,
}

impl ParsedIntent {
    /// Returns true if the extraction produced usable design content.
    pub fn has_usable_design(&self) -> bool {
        !self.design_content.trim().is_empty()
    }
}

/// Classified design feedback.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DesignFeedback {
    #[serde(rename = "isApproved")]
    pub is_approved: bool,
    #[serde(default)]
    pub changes: Option<String>,
}

/// Classified product-selection intent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectionIntent {
    pub action: SelectionAction,
    #[serde(default)]
    pub index: Option<usize>,
}

/// What the user wants to do with the shown product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionAction {
    Select,
    More,
    Unclear,
}

/// Parses raw AI output into a classified message.
pub fn classify(raw: &str) -> Result<ClassifiedMessage, ClassificationFailure> {
    serde_json::from_str(raw).map_err(|error| {
        debug!(%error, "classification output failed schema validation");
        ClassificationFailure
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_intent_with_details() {
        let raw = r#"{
            "type": "parse",
            "productDetails": {"type": "t-shirt", "color": "black"},
            "designContent": "cartoonish beagle"
        }"#;

        let Ok(ClassifiedMessage::Parse(intent)) = classify(raw) else {
            panic!("expected parse variant");
        };
        assert_eq!(intent.product_details.product_type.as_deref(), Some("t-shirt"));
        assert_eq!(intent.product_details.color.as_deref(), Some("black"));
        assert_eq!(intent.design_content, "cartoonish beagle");
        assert!(intent.has_usable_design());
    }

    #[test]
    fn parses_intent_with_missing_sections() {
        let raw = r#"{"type": "parse", "designContent": ""}"#;
        let Ok(ClassifiedMessage::Parse(intent)) = classify(raw) else {
            panic!("expected parse variant");
        };
        assert!(intent.product_details.is_empty());
        assert!(!intent.has_usable_design());
    }

    #[test]
    fn parses_design_feedback() {
        let raw = r#"{"type": "design_feedback", "isApproved": false, "changes": "add sunglasses"}"#;
        let Ok(ClassifiedMessage::DesignFeedback(feedback)) = classify(raw) else {
            panic!("expected feedback variant");
        };
        assert!(!feedback.is_approved);
        assert_eq!(feedback.changes.as_deref(), Some("add sunglasses"));
    }

    #[test]
    fn parses_approval_without_changes() {
        let raw = r#"{"type": "design_feedback", "isApproved": true}"#;
        let Ok(ClassifiedMessage::DesignFeedback(feedback)) = classify(raw) else {
            panic!("expected feedback variant");
        };
        assert!(feedback.is_approved);
        assert!(feedback.changes.is_none());
    }

    #[test]
    fn parses_selection_variants() {
        let select = r#"{"type": "product_choice", "action": "select", "index": 1}"#;
        let Ok(ClassifiedMessage::ProductChoice(intent)) = classify(select) else {
            panic!("expected choice variant");
        };
        assert_eq!(intent.action, SelectionAction::Select);
        assert_eq!(intent.index, Some(1));

        let more = r#"{"type": "product_choice", "action": "more"}"#;
        let Ok(ClassifiedMessage::ProductChoice(intent)) = classify(more) else {
            panic!("expected choice variant");
        };
        assert_eq!(intent.action, SelectionAction::More);
        assert!(intent.index.is_none());
    }

    #[test]
    fn malformed_json_is_a_classification_failure() {
        assert_eq!(classify("not json at all"), Err(ClassificationFailure));
    }

    #[test]
    fn unknown_tag_is_a_classification_failure() {
        assert_eq!(
            classify(r#"{"type": "poem", "text": "roses"}"#),
            Err(ClassificationFailure)
        );
    }

    #[test]
    fn missing_required_field_is_a_classification_failure() {
        // design_feedback without isApproved
        assert_eq!(
            classify(r#"{"type": "design_feedback", "changes": "x"}"#),
            Err(ClassificationFailure)
        );
    }
}
