//! Conversation orchestration.
//!
//! Owns the turn loop: every inbound message is appended to history and
//! dispatched on the current phase to exactly one handler, which may
//! delegate to the design studio, the catalog ranker, or the
//! configuration builder, and produces exactly one [`AgentReply`].
//!
//! Ambiguity and local errors (unparseable classification, out-of-range
//! selection) are answered with a chat reply and leave the phase
//! unchanged, so the user can simply try again. Remote-capability
//! failures abort the turn with a phase-tagged [`TurnError`]; the phase
//! is not rolled back.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::catalog::SearchPage;
use crate::domain::design::{DesignRecord, DesignStudio};
use crate::domain::fulfillment::{ConfigurationBuilder, ProductConfiguration};
use crate::ports::{Commerce, CommerceError, GenerativeAi};

use super::classifier::{
    self, ClassifiedMessage, SelectionAction, FEEDBACK_INSTRUCTION, INTENT_INSTRUCTION,
    SELECTION_INSTRUCTION,
};
use super::context::ConversationContext;
use super::errors::{ConfigureError, TurnError, TurnErrorKind};
use super::message::ChatMessage;
use super::phase::ConversationPhase;
use super::reply::AgentReply;

const INTAKE_REPROMPT: &str = "Could you please tell me what kind of product you'd like to \
     customize and what design you'd like on it?";
const FEEDBACK_REPROMPT: &str = "Should I keep this design, or would you like changes? Tell me \
     what to adjust, or say it looks good.";
const SELECTION_REPROMPT: &str = "Which of these options would you like? You can pick one by \
     number, or ask to see more.";
const INITIAL_DESIGN_MESSAGE: &str = "I've created an initial design based on your description. \
     How does this look? We can make any adjustments needed.";
const REVISED_DESIGN_MESSAGE: &str = "I've updated the design based on your feedback. How does \
     this look now?";
const MORE_OPTIONS_MESSAGE: &str = "Here are some more options that match your requirements. Let \
     me know which one you prefer.";
const NO_MORE_RESULTS_MESSAGE: &str = "I've shown you all the products that match your \
     requirements. Would you like to pick one of the options above?";

fn first_page_message(has_more: bool) -> String {
    let mut message = String::from(
        "Perfect! I've found some products that match your requirements. Take a look at these \
         options and let me know which one you prefer.",
    );
    if has_more {
        message.push_str("\n\nIf none of these are quite right, I can show you more options.");
    }
    message
}

/// Drives conversations through the fixed protocol.
///
/// Stateless across conversations: all per-conversation state lives in
/// the [`ConversationContext`] passed into each call.
pub struct ConversationOrchestrator {
    ai: Arc<dyn GenerativeAi>,
    commerce: Arc<dyn Commerce>,
    studio: DesignStudio,
    builder: ConfigurationBuilder,
}

impl ConversationOrchestrator {
    pub fn new(
        ai: Arc<dyn GenerativeAi>,
        commerce: Arc<dyn Commerce>,
        default_provider_id: Option<u64>,
    ) -> Self {
        let studio = DesignStudio::new(ai.clone());
        let builder = ConfigurationBuilder::new(commerce.clone(), default_provider_id);
        Self {
            ai,
            commerce,
            studio,
            builder,
        }
    }

    /// The design studio, for direct design generation outside the turn
    /// loop.
    pub fn studio(&self) -> &DesignStudio {
        &self.studio
    }

    /// Processes one inbound message and produces exactly one reply.
    pub async fn process_message(
        &self,
        ctx: &mut ConversationContext,
        message: ChatMessage,
    ) -> Result<AgentReply, TurnError> {
        info!(conversation = %ctx.id, phase = %ctx.phase, "processing message");
        ctx.push_message(message.clone());

        match ctx.phase {
            ConversationPhase::Intake => self.handle_intake(ctx, &message).await,
            ConversationPhase::DesignRefinement => self.handle_design_feedback(ctx, &message).await,
            ConversationPhase::ProductSelection => self.handle_product_choice(ctx, &message).await,
            ConversationPhase::Configured => Ok(self.handle_configured(ctx)),
        }
    }

    /// Materializes the purchasable product once selection is confirmed.
    pub async fn configure(
        &self,
        ctx: &mut ConversationContext,
    ) -> Result<ProductConfiguration, ConfigureError> {
        if ctx.phase != ConversationPhase::Configured {
            return Err(ConfigureError::NotReady { actual: ctx.phase });
        }
        let entry = ctx.selected_entry.clone().ok_or_else(|| {
            ConfigureError::Turn(TurnError::new(
                ctx.phase,
                "product configuration",
                TurnErrorKind::InvalidState("no catalog entry selected".to_string()),
            ))
        })?;
        let design = ctx.current_design.clone().ok_or_else(|| {
            ConfigureError::Turn(TurnError::new(
                ctx.phase,
                "product configuration",
                TurnErrorKind::InvalidState("no approved design".to_string()),
            ))
        })?;

        let config = self
            .builder
            .configure(&entry, &design.image_url)
            .await
            .map_err(|e| TurnError::new(ctx.phase, "product configuration", e))?;

        ctx.product_config = Some(config.clone());
        Ok(config)
    }

    /// Sends a phase instruction plus the user message to the chat
    /// capability and parses the answer. `Ok(None)` means the content
    /// was unparseable (classification unknown), recovered by callers.
    /// Transport failure of the capability itself is a turn failure.
    async fn classify(
        &self,
        phase: ConversationPhase,
        operation: &'static str,
        instruction: &str,
        message: &ChatMessage,
    ) -> Result<Option<ClassifiedMessage>, TurnError> {
        let prompt = [ChatMessage::user(instruction), message.clone()];
        let raw = self
            .ai
            .generate_chat_response(&prompt)
            .await
            .map_err(|e| TurnError::new(phase, operation, e))?;

        Ok(classifier::classify(&raw).ok())
    }

    async fn handle_intake(
        &self,
        ctx: &mut ConversationContext,
        message: &ChatMessage,
    ) -> Result<AgentReply, TurnError> {
        let classified = self
            .classify(
                ConversationPhase::Intake,
                "intent classification",
                INTENT_INSTRUCTION,
                message,
            )
            .await?;

        let intent = match classified {
            Some(ClassifiedMessage::Parse(intent)) if intent.has_usable_design() => intent,
            _ => {
                // Nothing usable: re-prompt, phase unchanged, so the
                // next attempt starts from the same place.
                debug!(conversation = %ctx.id, "intake intent unusable, re-prompting");
                return Ok(AgentReply::chat(INTAKE_REPROMPT));
            }
        };

        let design_content = intent.design_content.trim().to_string();
        let record = self
            .studio
            .generate(&design_content)
            .await
            .map_err(|e| TurnError::new(ConversationPhase::Intake, "initial design generation", e))?;

        ctx.product_details = intent.product_details.normalized();
        ctx.design_content = Some(design_content);
        ctx.current_design = Some(record.clone());
        ctx.advance_to(ConversationPhase::DesignRefinement);

        Ok(AgentReply::design(record, INITIAL_DESIGN_MESSAGE))
    }

    async fn handle_design_feedback(
        &self,
        ctx: &mut ConversationContext,
        message: &ChatMessage,
    ) -> Result<AgentReply, TurnError> {
        let feedback = match self
            .classify(
                ConversationPhase::DesignRefinement,
                "feedback classification",
                FEEDBACK_INSTRUCTION,
                message,
            )
            .await?
        {
            Some(ClassifiedMessage::DesignFeedback(feedback)) => feedback,
            _ => return Ok(AgentReply::chat(FEEDBACK_REPROMPT)),
        };

        let current = self.current_design(ctx, ConversationPhase::DesignRefinement)?;

        if feedback.is_approved {
            let approved = current.approved();
            ctx.current_design = Some(approved.clone());
            ctx.design_approved = true;

            let page = self.run_search(ctx, true).await.map_err(|e| {
                TurnError::new(ConversationPhase::DesignRefinement, "catalog search", e)
            })?;
            ctx.advance_to(ConversationPhase::ProductSelection);

            let message = first_page_message(page.has_more);
            Ok(AgentReply::design_and_products(approved, page, message))
        } else {
            let changes = feedback
                .changes
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| message.content.clone());

            let revised = self.studio.revise(&current, &changes).await.map_err(|e| {
                TurnError::new(ConversationPhase::DesignRefinement, "design revision", e)
            })?;
            ctx.current_design = Some(revised.clone());

            Ok(AgentReply::design(revised, REVISED_DESIGN_MESSAGE))
        }
    }

    async fn handle_product_choice(
        &self,
        ctx: &mut ConversationContext,
        message: &ChatMessage,
    ) -> Result<AgentReply, TurnError> {
        let choice = match self
            .classify(
                ConversationPhase::ProductSelection,
                "selection classification",
                SELECTION_INSTRUCTION,
                message,
            )
            .await?
        {
            Some(ClassifiedMessage::ProductChoice(choice)) => choice,
            _ => return Ok(AgentReply::chat(SELECTION_REPROMPT)),
        };

        match choice.action {
            SelectionAction::More => {
                let page = self.run_search(ctx, false).await.map_err(|e| {
                    TurnError::new(ConversationPhase::ProductSelection, "catalog search", e)
                })?;
                if page.products.is_empty() {
                    return Ok(AgentReply::chat(NO_MORE_RESULTS_MESSAGE));
                }

                let design = self.current_design(ctx, ConversationPhase::ProductSelection)?;
                Ok(AgentReply::design_and_products(
                    design,
                    page,
                    MORE_OPTIONS_MESSAGE,
                ))
            }
            SelectionAction::Select => {
                let Some(index) = choice.index else {
                    return Ok(AgentReply::chat(SELECTION_REPROMPT));
                };
                let entry = match ctx.select_from_last_page(index) {
                    Ok(entry) => entry.clone(),
                    Err(error) => {
                        warn!(conversation = %ctx.id, %error, "selection rejected");
                        return Ok(AgentReply::chat(format!(
                            "That selection isn't one of the options shown. I listed {} \
                             product(s), so please choose one of those, or ask to see more.",
                            ctx.last_page.len()
                        )));
                    }
                };

                ctx.selected_entry = Some(entry.clone());
                ctx.advance_to(ConversationPhase::Configured);
                Ok(AgentReply::selection_confirmed(&entry))
            }
            SelectionAction::Unclear => Ok(AgentReply::chat(SELECTION_REPROMPT)),
        }
    }

    fn handle_configured(&self, ctx: &ConversationContext) -> AgentReply {
        let message = match &ctx.product_config {
            Some(config) => format!(
                "Your product has been created and published (id {}). Start a new conversation \
                 to design another.",
                config.product_id
            ),
            None => "Your selection is confirmed and the design is approved. I can create and \
                     publish the product whenever you're ready."
                .to_string(),
        };
        AgentReply::chat(message)
    }

    /// Runs the catalog search. A reset (or a first search) fetches a
    /// fresh snapshot and recomputes the ranking; otherwise the cached
    /// ranking pages forward. The last delivered non-empty page is kept
    /// for selection validation.
    async fn run_search(
        &self,
        ctx: &mut ConversationContext,
        reset: bool,
    ) -> Result<SearchPage, CommerceError> {
        if reset || !ctx.ranker.has_ranking() {
            let snapshot = self.commerce.get_blueprints().await?;
            ctx.ranker.reset(snapshot, &ctx.product_details);
        }

        let page = ctx.ranker.next_page();
        if reset || !page.products.is_empty() {
            ctx.last_page = page.products.clone();
        }
        Ok(page)
    }

    fn current_design(
        &self,
        ctx: &ConversationContext,
        phase: ConversationPhase,
    ) -> Result<DesignRecord, TurnError> {
        ctx.current_design.clone().ok_or_else(|| {
            TurnError::new(
                phase,
                "design lookup",
                TurnErrorKind::InvalidState("no current design for this phase".to_string()),
            )
        })
    }
}
