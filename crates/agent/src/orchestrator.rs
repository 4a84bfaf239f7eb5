//! Session orchestrator: one user utterance in, one response out.

use calagent_core::message::{Message, SessionId};
use calagent_core::session::SessionStore;
use std::sync::Arc;
use tracing::{error, info};

use crate::parser::FINAL_ANSWER;
use crate::react::ReactLoop;

/// Returned when the model finishes with an empty final answer.
pub const EMPTY_ANSWER: &str = "I don't have an answer for that.";

/// Drives turns for many sessions over a shared [`ReactLoop`].
///
/// A session's state stays locked for the whole turn, so concurrent turns
/// for the same session run one after another while different sessions
/// proceed in parallel.
pub struct SessionOrchestrator {
    agent: Arc<ReactLoop>,
    store: Arc<dyn SessionStore>,
}

impl SessionOrchestrator {
    pub fn new(agent: Arc<ReactLoop>, store: Arc<dyn SessionStore>) -> Self {
        Self { agent, store }
    }

    pub fn agent(&self) -> &ReactLoop {
        &self.agent
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Handle one user utterance and return the response text.
    ///
    /// Never fails: model errors come back as `Error: <reason>`, and the
    /// result is never empty.
    pub async fn handle_turn(&self, session_id: &SessionId, user_text: &str) -> String {
        let handle = self.store.session(session_id).await;
        let mut state = handle.lock().await;

        state.reset_steps();
        state.push(Message::user(user_text));

        match self.agent.run(&mut state).await {
            Ok(answer) if answer.is_empty() => EMPTY_ANSWER.to_string(),
            Ok(answer) => {
                info!(session_id = %session_id, steps = state.steps(), "Turn answered");
                answer
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Turn failed");
                let response = format!("Error: {e}");
                // Close the turn so the next one sees how this one ended.
                state.push(Message::assistant(format!("{FINAL_ANSWER} {response}")));
                response
            }
        }
    }
}
