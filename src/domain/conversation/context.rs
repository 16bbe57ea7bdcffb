//! Per-conversation mutable state.

use tracing::info;

use crate::domain::catalog::{CatalogEntry, ProductDetails, ProductRanker};
use crate::domain::design::DesignRecord;
use crate::domain::foundation::ConversationId;
use crate::domain::fulfillment::ProductConfiguration;

use super::errors::SelectionError;
use super::message::ChatMessage;
use super::phase::ConversationPhase;

/// All mutable state for one conversation.
///
/// Owned exclusively by the orchestrator for the duration of a turn; the
/// session layer guarantees turns for one conversation never run
/// concurrently. Created at conversation start, discarded at the end;
/// nothing here is persisted.
#[derive(Debug, Default)]
pub struct ConversationContext {
    pub id: ConversationId,
    /// Current stage in the conversation protocol.
    pub phase: ConversationPhase,
    /// Append-only message history.
    history: Vec<ChatMessage>,
    /// Attributes extracted at intake; drives catalog ranking.
    pub product_details: ProductDetails,
    /// Design description extracted at intake.
    pub design_content: Option<String>,
    /// Head of the design lineage (previous records are superseded).
    pub current_design: Option<DesignRecord>,
    pub design_approved: bool,
    /// Session-scoped catalog ranking and pagination state.
    pub ranker: ProductRanker,
    /// The page most recently delivered to the user; selection indexes
    /// are validated against it.
    pub last_page: Vec<CatalogEntry>,
    pub selected_entry: Option<CatalogEntry>,
    pub product_config: Option<ProductConfiguration>,
}

impl ConversationContext {
    /// Creates a fresh context in the intake phase.
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Appends a message to the history. Messages are immutable once
    /// appended.
    pub fn push_message(&mut self, message: ChatMessage) {
        self.history.push(message);
    }

    /// The full message history, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Advances the protocol to `next`.
    pub fn advance_to(&mut self, next: ConversationPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "invalid phase transition {} -> {}",
            self.phase,
            next
        );
        info!(conversation = %self.id, from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }

    /// Resolves a selection index against the last delivered page.
    pub fn select_from_last_page(&self, index: usize) -> Result<&CatalogEntry, SelectionError> {
        self.last_page.get(index).ok_or(SelectionError {
            index,
            shown: self.last_page.len(),
        })
    }
}
