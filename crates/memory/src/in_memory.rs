//! In-memory session store: volatile, lives for the life of the process.

use async_trait::async_trait;
use calagent_core::message::{ConversationState, SessionId};
use calagent_core::session::{SessionHandle, SessionStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Holds one lockable [`ConversationState`] per session id.
///
/// The outer map lock is only held to find or insert a handle; turns lock
/// the per-session mutex, so unrelated sessions never wait on each other.
/// Sessions are never evicted.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn session(&self, id: &SessionId) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(id) {
            return handle.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.clone())
            .or_insert_with(|| {
                debug!(session_id = %id, "Creating session state");
                Arc::new(Mutex::new(ConversationState::new(id.clone())))
            })
            .clone()
    }

    async fn snapshot(&self, id: &SessionId) -> Option<ConversationState> {
        let handle = self.sessions.read().await.get(id).cloned()?;
        let state = handle.lock().await;
        Some(state.clone())
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
