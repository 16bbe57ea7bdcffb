//! Conversation phases.
//!
//! A conversation moves through a fixed, strictly forward protocol:
//!
//! `Intake → DesignRefinement → ProductSelection → Configured`
//!
//! The orchestrator dispatches every inbound message on the current phase,
//! and only a handler's success path may advance it. Failed or ambiguous
//! turns leave the phase untouched, so the user can simply try again.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The orchestrator's current stage in the conversation protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    /// Parsing the user's initial intent into product details and design
    /// content.
    Intake,

    /// Iterating on a generated design until the user approves it.
    DesignRefinement,

    /// Presenting ranked catalog pages until the user picks an entry.
    ProductSelection,

    /// A catalog entry is selected and the design is approved; the
    /// conversation is ready for the configuration handoff.
    Configured,
}

impl ConversationPhase {
    /// Returns a short label for the phase, suitable for logs and UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::DesignRefinement => "design_refinement",
            Self::ProductSelection => "product_selection",
            Self::Configured => "configured",
        }
    }

    /// Returns the phase that follows this one, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Intake => Some(Self::DesignRefinement),
            Self::DesignRefinement => Some(Self::ProductSelection),
            Self::ProductSelection => Some(Self::Configured),
            Self::Configured => None,
        }
    }

    /// Returns true if a transition to `target` is valid.
    ///
    /// The protocol is strictly forward and single-step: a phase may only
    /// advance to its immediate successor.
    pub fn can_advance_to(&self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Returns true if the protocol is complete.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Configured)
    }
}

impl Default for ConversationPhase {
    fn default() -> Self {
        Self::Intake
    }
}

impl fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ConversationPhase; 4] = [
        ConversationPhase::Intake,
        ConversationPhase::DesignRefinement,
        ConversationPhase::ProductSelection,
        ConversationPhase::Configured,
    ];

    #[test]
    fn default_phase_is_intake() {
        assert_eq!(ConversationPhase::default(), ConversationPhase::Intake);
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&ConversationPhase::DesignRefinement).unwrap();
        assert_eq!(json, "\"design_refinement\"");
    }

    #[test]
    fn deserializes_from_snake_case() {
        let phase: ConversationPhase = serde_json::from_str("\"product_selection\"").unwrap();
        assert_eq!(phase, ConversationPhase::ProductSelection);
    }

    #[test]
    fn protocol_is_strictly_forward() {
        assert!(ConversationPhase::Intake.can_advance_to(ConversationPhase::DesignRefinement));
        assert!(
            ConversationPhase::DesignRefinement.can_advance_to(ConversationPhase::ProductSelection)
        );
        assert!(ConversationPhase::ProductSelection.can_advance_to(ConversationPhase::Configured));
    }

    #[test]
    fn no_backward_or_skipping_transitions() {
        assert!(!ConversationPhase::Intake.can_advance_to(ConversationPhase::ProductSelection));
        assert!(!ConversationPhase::DesignRefinement.can_advance_to(ConversationPhase::Intake));
        assert!(!ConversationPhase::Configured.can_advance_to(ConversationPhase::Intake));
    }

    #[test]
    fn only_configured_is_terminal() {
        for phase in ALL {
            assert_eq!(phase.is_terminal(), phase == ConversationPhase::Configured);
        }
    }

    #[test]
    fn all_phases_have_labels() {
        for phase in ALL {
            assert!(!phase.label().is_empty());
        }
    }
}
