//! ReAct loop: Thought → Action → Observation until a final answer.
//!
//! One call to [`ReactLoop::run`] drives a single turn over a conversation
//! state through the [`LoopState`] machine. The step counter counts model
//! calls; the caller resets it and appends the user message before running.

use calagent_config::AppConfig;
use calagent_core::error::ProviderError;
use calagent_core::message::{ConversationState, Message};
use calagent_core::provider::{Provider, ProviderRequest};
use calagent_core::tool::ToolRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::dispatcher::dispatch;
use crate::parser::{OBSERVATION, extract_final_answer};
use crate::prompt::system_prompt;
use crate::router::{DEFAULT_MAX_STEPS, LoopState, RouteDecision, route};

/// Default bound on a single model call.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

pub struct ReactLoop {
    /// LLM provider.
    provider: Arc<dyn Provider>,
    /// Model name.
    model: String,
    /// Temperature.
    temperature: f32,
    /// Max tokens per response.
    max_tokens: Option<u32>,
    /// Tool registry.
    tools: Arc<ToolRegistry>,
    /// Maximum model calls per turn.
    max_steps: u32,
    /// Bound on each model call.
    model_timeout: Duration,
    /// Prepended to every request.
    system_prompt: String,
}

impl ReactLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        let system_prompt = system_prompt(&tools.descriptors());
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            tools,
            max_steps: DEFAULT_MAX_STEPS,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            system_prompt,
        }
    }

    /// Build a loop using the model, sampling and agent settings in `config`.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        let model = config
            .providers
            .get(&config.default_provider)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| config.default_model.clone());

        Self::new(provider, model, tools)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
            .with_max_steps(config.agent.max_steps)
            .with_model_timeout(Duration::from_secs(config.agent.model_timeout_secs))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the step budget. Zero is bumped to one.
    pub fn with_max_steps(mut self, max: u32) -> Self {
        self.max_steps = max.max(1);
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run one turn to termination and return the final text.
    ///
    /// Observations, forced final messages and every model reply are
    /// appended to `state`. Errors come only from the model call.
    pub async fn run(&self, state: &mut ConversationState) -> calagent_core::Result<String> {
        let session_id = state.session_id.clone();
        let mut current = LoopState::CallModel;

        info!(session_id = %session_id, model = %self.model, max_steps = self.max_steps, "ReAct turn starting");

        loop {
            current = match current {
                LoopState::CallModel => {
                    let reply = self.call_model(state).await?;
                    let step = state.record_step();
                    debug!(session_id = %session_id, step, "Model replied");
                    state.push(reply);
                    LoopState::Route
                }

                LoopState::Route => {
                    let content = state.last().map(|m| m.content.as_str()).unwrap_or_default();
                    let decision = route(content, state.steps(), self.max_steps);

                    match &decision {
                        RouteDecision::BudgetExhausted => {
                            warn!(session_id = %session_id, steps = state.steps(), "Step budget exhausted")
                        }
                        RouteDecision::Ambiguous => {
                            warn!(session_id = %session_id, step = state.steps(), "Ambiguous model response")
                        }
                        RouteDecision::FinalAnswer(_) => {
                            debug!(session_id = %session_id, step = state.steps(), "Final answer")
                        }
                        RouteDecision::DispatchAction => {}
                    }

                    if let Some(forced) = decision.forced_message() {
                        state.push(Message::assistant(forced));
                    }
                    decision.next_state()
                }

                LoopState::DispatchAction => {
                    let content = state
                        .last()
                        .map(|m| m.content.clone())
                        .unwrap_or_default();
                    let observation = dispatch(&self.tools, &content).await;
                    debug!(session_id = %session_id, step = state.steps(), observation = %observation.content, "Observation appended");
                    state.push(observation);
                    LoopState::CallModel
                }

                LoopState::Terminated => {
                    let content = state.last().map(|m| m.content.as_str()).unwrap_or_default();
                    let answer =
                        extract_final_answer(content).unwrap_or_else(|| content.trim().to_string());
                    info!(session_id = %session_id, steps = state.steps(), "ReAct turn completed");
                    return Ok(answer);
                }
            };
        }
    }

    async fn call_model(&self, state: &ConversationState) -> Result<Message, ProviderError> {
        let mut messages = Vec::with_capacity(state.messages().len() + 1);
        messages.push(Message::system(self.system_prompt.as_str()));
        messages.extend(state.messages().iter().cloned());

        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: vec![OBSERVATION.to_string()],
        };

        let response = tokio::time::timeout(self.model_timeout, self.provider.complete(request))
            .await
            .map_err(|_| {
                ProviderError::Timeout(format!(
                    "no reply from {} within {}s",
                    self.provider.name(),
                    self.model_timeout.as_secs()
                ))
            })??;

        if let Some(usage) = &response.usage {
            debug!(model = %response.model, tokens = usage.total_tokens, "Completion usage");
        }

        // Whatever role the backend reports, the reply is the assistant's.
        Ok(Message::assistant(response.message.content))
    }
}
