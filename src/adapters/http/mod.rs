//! HTTP adapter: DTOs, handlers, and routes.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{ApiError, AppState};
pub use routes::{api_router, api_routes};
