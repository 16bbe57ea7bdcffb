//! Axum routes for the API surface.
//!
//! Endpoints:
//! - POST /api/chat - process one conversation turn
//! - POST /api/designs - generate a design directly
//! - GET  /api/products?q= - first page of a ranked product search
//! - POST /api/products/configure - materialize the selected product

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{get_products, post_chat, post_configure, post_design, AppState};

/// Creates the API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(post_chat))
        .route("/designs", post(post_design))
        .route("/products", get(get_products))
        .route("/products/configure", post(post_configure))
}

/// Combined router with all routes nested under /api.
pub fn api_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}
