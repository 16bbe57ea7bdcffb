//! HTTP handlers for the API surface.
//!
//! Thin wiring from Axum to the application layer; every decision of
//! interest happens below.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing::error;

use crate::application::ChatService;
use crate::domain::conversation::{ChatMessage, ConfigureError, TurnError};
use crate::domain::design::DesignError;
use crate::ports::CommerceError;

use super::dto::{
    AssistantEnvelope, ChatRequest, ConfigureRequest, DesignRequest, ErrorResponse, ProductQuery,
};

/// Shared application state for the API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat: Arc<ChatService>) -> Self {
        Self { chat }
    }
}

/// API error mapped onto an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Conflict(String),
    NotFound(String),
    UpstreamFailure(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            Self::Conflict(m) => (StatusCode::CONFLICT, m),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m),
            Self::UpstreamFailure(m) => (StatusCode::BAD_GATEWAY, m),
            Self::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<TurnError> for ApiError {
    fn from(err: TurnError) -> Self {
        error!(%err, "turn failed");
        Self::UpstreamFailure(err.to_string())
    }
}

impl From<DesignError> for ApiError {
    fn from(err: DesignError) -> Self {
        error!(%err, "design generation failed");
        Self::UpstreamFailure(err.to_string())
    }
}

impl From<CommerceError> for ApiError {
    fn from(err: CommerceError) -> Self {
        error!(%err, "commerce request failed");
        Self::UpstreamFailure(err.to_string())
    }
}

impl From<ConfigureError> for ApiError {
    fn from(err: ConfigureError) -> Self {
        match err {
            ConfigureError::UnknownConversation(_) => Self::NotFound(err.to_string()),
            ConfigureError::NotReady { .. } => Self::Conflict(err.to_string()),
            ConfigureError::Turn(turn) => turn.into(),
        }
    }
}

/// `POST /api/chat` - process one conversation turn.
pub async fn post_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.content.trim().is_empty() {
        return Err(ApiError::BadRequest("message content is empty".to_string()));
    }

    let message = ChatMessage::new(request.role, request.content);
    let (conversation_id, reply) = state.chat.process(request.conversation_id, message).await?;

    let envelope = AssistantEnvelope::wrap(conversation_id, &reply)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((StatusCode::OK, Json(envelope)))
}

/// `POST /api/designs` - generate a design directly.
pub async fn post_design(
    State(state): State<AppState>,
    Json(request): Json<DesignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("design prompt is empty".to_string()));
    }

    let record = state
        .chat
        .generate_design(request.conversation_id, &request.prompt)
        .await?;
    Ok((StatusCode::OK, Json(record)))
}

/// `GET /api/products?q=` - stateless first page of a ranked search.
pub async fn get_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.chat.search_products(query.q).await?;
    Ok((StatusCode::OK, Json(page)))
}

/// `POST /api/products/configure` - materialize the selected product.
pub async fn post_configure(
    State(state): State<AppState>,
    Json(request): Json<ConfigureRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let config = state.chat.configure(request.conversation_id).await?;
    Ok((StatusCode::OK, Json(config)))
}
