//! Message and conversation state domain types.
//!
//! These are the value objects that flow through the reasoning loop:
//! user sends a prompt → orchestrator appends it → model replies → router
//! appends observations until a final answer is reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-supplied identifier scoping one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions prepended to every model call
    System,
    /// The end user
    User,
    /// The model, and observations fed back to it
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single turn in the conversation. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }
}

/// Per-session container: ordered history plus the step counter of the
/// turn in progress.
///
/// Messages are append-only; nothing here reorders or prunes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    /// Which session this state belongs to
    pub session_id: SessionId,

    /// Ordered messages, the entire model context apart from the system prompt
    messages: Vec<Message>,

    /// Model calls made in the current turn
    steps: u32,

    /// When this state was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// Create an empty state for a session.
    pub fn new(session_id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            messages: Vec::new(),
            steps: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message to the history.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Reset the step counter. Called once at the start of every turn.
    pub fn reset_steps(&mut self) {
        self.steps = 0;
    }

    /// Count one completed model call.
    pub fn record_step(&mut self) -> u32 {
        self.steps += 1;
        self.steps
    }
}
