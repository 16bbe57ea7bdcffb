//! Conversation orchestration: phases, context, classification, and the
//! turn loop.

mod classifier;
mod context;
mod errors;
mod message;
mod orchestrator;
mod phase;
mod reply;

pub use classifier::{
    classify, ClassificationFailure, ClassifiedMessage, DesignFeedback, ParsedIntent,
    SelectionAction, SelectionIntent, FEEDBACK_INSTRUCTION, INTENT_INSTRUCTION,
    SELECTION_INSTRUCTION,
};
pub use context::ConversationContext;
pub use errors::{ConfigureError, SelectionError, TurnError, TurnErrorKind};
pub use message::{ChatMessage, MessageRole};
pub use orchestrator::ConversationOrchestrator;
pub use phase::ConversationPhase;
pub use reply::{AgentReply, SelectionStatus};
