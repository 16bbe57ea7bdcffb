//! HTTP DTOs for the API surface.
//!
//! These types decouple the wire contract from domain types.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{AgentReply, MessageRole};
use crate::domain::foundation::ConversationId;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub content: String,
    pub role: MessageRole,
    /// Absent on the first message of a new conversation.
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
}

/// The assistant message envelope returned by `POST /api/chat`.
///
/// `content` is the structured reply serialized as a JSON string, nested
/// inside the `{role, content}` message shape the client renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantEnvelope {
    pub role: MessageRole,
    pub content: String,
    pub conversation_id: ConversationId,
}

impl AssistantEnvelope {
    /// Wraps a reply into the assistant envelope.
    pub fn wrap(
        conversation_id: ConversationId,
        reply: &AgentReply,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            role: MessageRole::Assistant,
            content: serde_json::to_string(reply)?,
            conversation_id,
        })
    }
}

/// Body of `POST /api/designs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    pub prompt: String,
    pub conversation_id: ConversationId,
}

/// Query of `GET /api/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Body of `POST /api/products/configure`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureRequest {
    pub conversation_id: ConversationId,
}

/// Error body for all non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_accepts_missing_conversation_id() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"content": "hi", "role": "user"}"#).unwrap();
        assert!(request.conversation_id.is_none());
        assert_eq!(request.role, MessageRole::User);
    }

    #[test]
    fn envelope_nests_the_reply_as_a_json_string() {
        let id = ConversationId::new();
        let envelope = AssistantEnvelope::wrap(id, &AgentReply::chat("hello")).unwrap();

        assert_eq!(envelope.role, MessageRole::Assistant);
        let inner: AgentReply = serde_json::from_str(&envelope.content).unwrap();
        assert_eq!(inner, AgentReply::chat("hello"));

        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["content"].is_string());
        assert_eq!(json["conversationId"], id.to_string());
    }
}
