//! Turn-level error types.
//!
//! Two classes of failure exist per the propagation policy:
//!
//! - *Local* failures (`ClassificationFailure`, `SelectionError`) are
//!   recovered inside the turn: the phase stays unchanged and the user
//!   gets a chat reply. They never escape `process_message`.
//! - *Remote-capability* failures are wrapped with the phase and
//!   operation they occurred in and rethrown as [`TurnError`]. The phase
//!   is **not** rolled back; the user retrying the turn is the recovery
//!   path.

use crate::domain::design::DesignError;
use crate::domain::foundation::ConversationId;
use crate::domain::fulfillment::FulfillmentError;
use crate::ports::{AiError, CommerceError};

use super::phase::ConversationPhase;

/// A turn aborted by a remote-capability failure, tagged with where in
/// the protocol it happened.
#[derive(Debug, thiserror::Error)]
#[error("{phase} turn failed during {operation}: {source}")]
pub struct TurnError {
    pub phase: ConversationPhase,
    pub operation: &'static str,
    #[source]
    pub source: TurnErrorKind,
}

impl TurnError {
    pub fn new(
        phase: ConversationPhase,
        operation: &'static str,
        source: impl Into<TurnErrorKind>,
    ) -> Self {
        Self {
            phase,
            operation,
            source: source.into(),
        }
    }
}

/// The underlying failure behind a [`TurnError`].
#[derive(Debug, thiserror::Error)]
pub enum TurnErrorKind {
    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Design(#[from] DesignError),

    #[error(transparent)]
    Catalog(#[from] CommerceError),

    #[error(transparent)]
    Fulfillment(#[from] FulfillmentError),

    /// The conversation's state does not support the attempted
    /// operation (an invariant the protocol should have upheld).
    #[error("invalid conversation state: {0}")]
    InvalidState(String),
}

/// The user selected an index outside the last delivered page.
///
/// Recovered locally as a chat reply; the phase stays unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("selection index {index} is out of range: {shown} products were shown")]
pub struct SelectionError {
    pub index: usize,
    pub shown: usize,
}

/// Errors from the product-configuration handoff.
#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    #[error("unknown conversation {0}")]
    UnknownConversation(ConversationId),

    #[error("conversation is in the {actual} phase; configuration requires a confirmed selection")]
    NotReady { actual: ConversationPhase },

    #[error(transparent)]
    Turn(#[from] TurnError),
}
