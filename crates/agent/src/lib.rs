//! The calendar agent's reasoning loop.
//!
//! The agent follows a **Thought → Action → Observation** cycle:
//!
//! 1. **Receive** a user message for a session
//! 2. **Call the model** with the system prompt and the session history
//! 3. **Route** the reply: final answer, tool action, ambiguous, or out of budget
//! 4. **If action**: validate and run the tool, append the observation, go to 2
//! 5. **Otherwise**: return the final answer text
//!
//! The loop stops at the first final answer, on ambiguous output, or when
//! the step budget is spent.

pub mod dispatcher;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod react;
pub mod router;

#[cfg(test)]
mod test_helpers;

pub use dispatcher::dispatch;
pub use orchestrator::SessionOrchestrator;
pub use parser::{ToolCallRequest, extract_final_answer, parse_action};
pub use react::ReactLoop;
pub use router::{LoopState, RouteDecision, route};
