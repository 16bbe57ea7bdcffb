//! Application façade over the orchestrator.
//!
//! Resolves conversations from the session store, holds the
//! per-conversation lock for the whole turn (turn ordering per
//! conversation, full parallelism across conversations), and exposes
//! the direct-design, stateless-search, and configuration operations the
//! HTTP surface needs.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::{ProductDetails, ProductRanker, SearchPage};
use crate::domain::conversation::{
    AgentReply, ChatMessage, ConfigureError, ConversationOrchestrator, TurnError,
};
use crate::domain::design::{DesignError, DesignRecord};
use crate::domain::foundation::ConversationId;
use crate::domain::fulfillment::ProductConfiguration;
use crate::ports::{Commerce, CommerceError, GenerativeAi};

use super::sessions::SessionStore;

/// Entry point for everything a client can do with a conversation.
pub struct ChatService {
    orchestrator: ConversationOrchestrator,
    commerce: Arc<dyn Commerce>,
    sessions: SessionStore,
}

impl ChatService {
    pub fn new(
        ai: Arc<dyn GenerativeAi>,
        commerce: Arc<dyn Commerce>,
        default_provider_id: Option<u64>,
    ) -> Self {
        Self {
            orchestrator: ConversationOrchestrator::new(ai, commerce.clone(), default_provider_id),
            commerce,
            sessions: SessionStore::new(),
        }
    }

    /// Processes one turn. A missing conversation id starts a new
    /// conversation; the minted id is returned alongside the reply.
    pub async fn process(
        &self,
        conversation_id: Option<ConversationId>,
        message: ChatMessage,
    ) -> Result<(ConversationId, AgentReply), TurnError> {
        let id = conversation_id.unwrap_or_else(|| {
            let id = ConversationId::new();
            info!(conversation = %id, "starting conversation");
            id
        });

        let session = self.sessions.get_or_create(id).await;
        let mut ctx = session.lock().await;
        let reply = self.orchestrator.process_message(&mut ctx, message).await?;
        Ok((id, reply))
    }

    /// Generates a design directly, outside the turn loop, and records
    /// it as the conversation's current design.
    pub async fn generate_design(
        &self,
        conversation_id: ConversationId,
        prompt: &str,
    ) -> Result<DesignRecord, DesignError> {
        let session = self.sessions.get_or_create(conversation_id).await;
        let mut ctx = session.lock().await;

        let record = self.orchestrator.studio().generate(prompt).await?;
        ctx.current_design = Some(record.clone());
        Ok(record)
    }

    /// Stateless product search: ranks a fresh catalog snapshot against
    /// a free-text query (used as the requested product type) and
    /// returns the first page.
    pub async fn search_products(
        &self,
        query: Option<String>,
    ) -> Result<SearchPage, CommerceError> {
        let details = ProductDetails {
            product_type: query.filter(|q| !q.trim().is_empty()),
            ..Default::default()
        };

        let snapshot = self.commerce.get_blueprints().await?;
        let mut ranker = ProductRanker::new();
        ranker.reset(snapshot, &details);
        Ok(ranker.next_page())
    }

    /// Materializes the purchasable product for a conversation whose
    /// selection is confirmed.
    pub async fn configure(
        &self,
        conversation_id: ConversationId,
    ) -> Result<ProductConfiguration, ConfigureError> {
        let session = self
            .sessions
            .get(conversation_id)
            .await
            .ok_or(ConfigureError::UnknownConversation(conversation_id))?;
        let mut ctx = session.lock().await;
        self.orchestrator.configure(&mut ctx).await
    }

    /// Ends a conversation, discarding its context.
    pub async fn end_conversation(&self, conversation_id: ConversationId) -> bool {
        self.sessions.remove(conversation_id).await
    }
}
