//! Control-loop router.
//!
//! A turn moves through [`LoopState`]s:
//!
//! ```text
//! CallModel ──▶ Route ──▶ DispatchAction ──▶ CallModel ...
//!                 │
//!                 └──▶ Terminated
//! ```
//!
//! [`route`] runs right after every model call and decides, in order:
//! budget exhausted, final answer, tool action, or ambiguous output.

use crate::parser::{ACTION, ACTION_INPUT, FINAL_ANSWER, extract_final_answer};

/// Forced final message when the step budget runs out.
pub const TOO_MANY_STEPS: &str = "Final Answer: Too many steps.";

/// Forced final message when the model output has no usable marker.
pub const AMBIGUOUS_RESPONSE: &str = "Final Answer: Ambiguous response.";

/// Default maximum number of model calls per turn.
pub const DEFAULT_MAX_STEPS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    CallModel,
    Route,
    DispatchAction,
    Terminated,
}

/// The outcome of routing one model message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// The step counter reached the budget.
    BudgetExhausted,
    /// The model gave a final answer (marker stripped, trimmed).
    FinalAnswer(String),
    /// The message carries an action to dispatch.
    DispatchAction,
    /// Nothing usable in the message.
    Ambiguous,
}

impl RouteDecision {
    /// The state the loop moves to.
    pub fn next_state(&self) -> LoopState {
        match self {
            RouteDecision::DispatchAction => LoopState::DispatchAction,
            _ => LoopState::Terminated,
        }
    }

    /// The final message the loop must append before terminating, if any.
    pub fn forced_message(&self) -> Option<&'static str> {
        match self {
            RouteDecision::BudgetExhausted => Some(TOO_MANY_STEPS),
            RouteDecision::Ambiguous => Some(AMBIGUOUS_RESPONSE),
            _ => None,
        }
    }
}

/// Decide what follows the latest model message.
///
/// `steps` is the number of model calls made so far in this turn. The budget
/// is checked first, so a final answer arriving on the last allowed call is
/// still replaced by the budget message.
pub fn route(content: &str, steps: u32, max_steps: u32) -> RouteDecision {
    if steps >= max_steps {
        return RouteDecision::BudgetExhausted;
    }

    if content.contains(FINAL_ANSWER) {
        return RouteDecision::FinalAnswer(extract_final_answer(content).unwrap_or_default());
    }

    if content.contains(ACTION) && content.contains(ACTION_INPUT) {
        return RouteDecision::DispatchAction;
    }

    RouteDecision::Ambiguous
}
