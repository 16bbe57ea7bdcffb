//! The per-turn response union.
//!
//! Exactly one variant is produced per turn; the tag determines which
//! fields are present (a reply never carries both an image payload and
//! bare chat text). This is the single canonical schema; historical
//! variants of the wire format collapse into it.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CatalogEntry, SearchPage};
use crate::domain::design::{DesignRecord, DesignStatus};

/// Status of a product selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStatus {
    /// The user is still browsing options.
    Selecting,
    /// A catalog entry has been chosen.
    Confirmed,
}

/// One structured response per processed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentReply {
    /// Plain conversational text (clarifications, re-prompts, errors
    /// recovered within the turn).
    Chat { message: String },

    /// A generated or revised design awaiting feedback.
    #[serde(rename_all = "camelCase")]
    Design {
        #[serde(flatten)]
        design: DesignRecord,
        message: String,
    },

    /// An approved design together with a page of ranked products.
    #[serde(rename_all = "camelCase")]
    DesignAndProducts {
        design: DesignRecord,
        products: Vec<CatalogEntry>,
        has_more: bool,
        status: DesignStatus,
        message: String,
    },

    /// Confirmation of a catalog entry selection.
    #[serde(rename_all = "camelCase")]
    ProductSelection {
        status: SelectionStatus,
        selected_entry_id: u64,
        message: String,
    },
}

impl AgentReply {
    /// Builds a chat reply.
    pub fn chat(message: impl Into<String>) -> Self {
        Self::Chat {
            message: message.into(),
        }
    }

    /// Builds a design reply.
    pub fn design(design: DesignRecord, message: impl Into<String>) -> Self {
        Self::Design {
            design,
            message: message.into(),
        }
    }

    /// Builds a design-and-products reply from a search page.
    pub fn design_and_products(
        design: DesignRecord,
        page: SearchPage,
        message: impl Into<String>,
    ) -> Self {
        Self::DesignAndProducts {
            status: design.status,
            design,
            products: page.products,
            has_more: page.has_more,
            message: message.into(),
        }
    }

    /// Builds a confirmed-selection reply for an entry.
    pub fn selection_confirmed(entry: &CatalogEntry) -> Self {
        Self::ProductSelection {
            status: SelectionStatus::Confirmed,
            selected_entry_id: entry.id,
            message: format!("Great choice! I've selected the {} for your design.", entry.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::CatalogEntry;

    fn record(status: DesignStatus) -> DesignRecord {
        DesignRecord {
            image_url: "https://images.test/design.png".to_string(),
            analysis: None,
            original_prompt: "a beagle".to_string(),
            current_prompt: "a beagle".to_string(),
            status,
        }
    }

    fn round_trip(reply: &AgentReply) -> AgentReply {
        let json = serde_json::to_string(reply).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn chat_round_trips() {
        let reply = AgentReply::chat("Could you tell me more?");
        assert_eq!(round_trip(&reply), reply);
    }

    #[test]
    fn design_round_trips_and_flattens_the_record() {
        let reply = AgentReply::design(record(DesignStatus::Refining), "How does this look?");
        assert_eq!(round_trip(&reply), reply);

        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "design");
        assert_eq!(json["imageUrl"], "https://images.test/design.png");
        assert_eq!(json["status"], "refining");
    }

    #[test]
    fn design_and_products_round_trips() {
        let page = SearchPage {
            products: vec![CatalogEntry::new(1, "Tee"), CatalogEntry::new(2, "Mug")],
            has_more: true,
            total_remaining: 4,
        };
        let reply = AgentReply::design_and_products(
            record(DesignStatus::Approved),
            page,
            "Take a look at these options.",
        );
        assert_eq!(round_trip(&reply), reply);

        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "design_and_products");
        assert_eq!(json["hasMore"], true);
        assert_eq!(json["status"], "approved");
        assert_eq!(json["products"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn selection_round_trips() {
        let reply = AgentReply::selection_confirmed(&CatalogEntry::new(7, "Canvas Tote"));
        assert_eq!(round_trip(&reply), reply);

        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "product_selection");
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["selectedEntryId"], 7);
    }

    #[test]
    fn selection_message_names_the_entry() {
        let reply = AgentReply::selection_confirmed(&CatalogEntry::new(7, "Canvas Tote"));
        let AgentReply::ProductSelection { message, .. } = reply else {
            panic!("expected selection reply");
        };
        assert!(message.contains("Canvas Tote"));
    }

    #[test]
    fn design_and_products_carries_the_design_status() {
        let reply = AgentReply::design_and_products(
            record(DesignStatus::Approved),
            SearchPage::empty(),
            "Here you go.",
        );
        let AgentReply::DesignAndProducts { status, .. } = reply else {
            panic!("expected design_and_products reply");
        };
        assert_eq!(status, DesignStatus::Approved);
    }
}
