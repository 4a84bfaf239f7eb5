//! Session store trait: where conversation state lives between turns.
//!
//! The store is a key-value interface from session id to a shared handle on
//! that session's [`ConversationState`]. Each handle wraps an async mutex:
//! whoever drives a turn holds the lock for the whole turn, so turns for the
//! same session queue up while different sessions proceed in parallel.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::message::{ConversationState, SessionId};

/// Shared, lockable state of one session.
pub type SessionHandle = Arc<Mutex<ConversationState>>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Backend name (e.g., "in_memory").
    fn name(&self) -> &str;

    /// Get the handle for a session, creating empty state on first use.
    async fn session(&self, id: &SessionId) -> SessionHandle;

    /// A copy of a session's state, without creating it.
    async fn snapshot(&self, id: &SessionId) -> Option<ConversationState>;

    /// Number of sessions currently held.
    async fn count(&self) -> usize;
}
