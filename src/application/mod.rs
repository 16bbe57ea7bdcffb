//! Application layer: session management and the conversation façade.

mod chat_service;
mod sessions;

pub use chat_service::ChatService;
pub use sessions::{SessionHandle, SessionStore};
