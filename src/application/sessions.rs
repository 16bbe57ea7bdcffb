//! In-memory session store.
//!
//! One [`ConversationContext`] per conversation, each behind its own
//! async mutex. Holding a conversation's lock for the duration of a turn
//! serializes that conversation's turns; different conversations run
//! fully in parallel. Contexts live only as long as the process; there
//! is no persistence.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::domain::conversation::ConversationContext;
use crate::domain::foundation::ConversationId;

/// Shared handle to one conversation's state.
pub type SessionHandle = Arc<Mutex<ConversationContext>>;

/// Stores conversation contexts keyed by conversation id.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<ConversationId, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating a fresh context if none
    /// exists yet.
    pub async fn get_or_create(&self, id: ConversationId) -> SessionHandle {
        if let Some(session) = self.sessions.read().await.get(&id) {
            return session.clone();
        }

        let mut sessions = self.sessions.write().await;
        // Double-check under the write lock: another task may have
        // created the session between our read and write.
        sessions
            .entry(id)
            .or_insert_with(|| {
                debug!(conversation = %id, "creating conversation context");
                Arc::new(Mutex::new(ConversationContext::new(id)))
            })
            .clone()
    }

    /// Returns the session for `id`, if one exists.
    pub async fn get(&self, id: ConversationId) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Discards a conversation's context. Returns true if it existed.
    pub async fn remove(&self, id: ConversationId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Number of live conversations.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if no conversations are live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
