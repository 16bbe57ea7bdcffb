//! Foundation types shared across the domain.

mod ids;

pub use ids::ConversationId;
