//! Shared test helpers: a scripted provider and a recording tool.

use async_trait::async_trait;
use calagent_core::error::{ProviderError, ToolError};
use calagent_core::message::Message;
use calagent_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use calagent_core::schema::{FieldKind, FieldSpec, InputSchema};
use calagent_core::tool::{Tool, ToolRegistry};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next entry. Running past the end of
/// the script is an error, not a panic, so budget tests can observe it.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    delay: Option<Duration>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Script of plain text replies.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    /// Sleep this long before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len() - 1
        };

        let next = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                None
            } else {
                Some(responses.remove(0))
            }
        };

        match next {
            Some(Ok(text)) => Ok(make_text_response(&text)),
            Some(Err(e)) => Err(e),
            None => Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("no scripted response for call #{call}"),
            }),
        }
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// A calendar-shaped tool that records its validated arguments and always
/// reports the slot as free.
pub struct RecordingTool {
    name: String,
    schema: InputSchema,
    calls: Arc<Mutex<Vec<Map<String, Value>>>>,
}

impl RecordingTool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            schema: InputSchema::new(vec![
                FieldSpec::required("date", FieldKind::String, "Meeting date"),
                FieldSpec::required("time", FieldKind::String, "Start time"),
                FieldSpec::required("duration_minutes", FieldKind::Integer, "Length"),
            ]),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the recorded calls; stays valid after the tool is
    /// moved into a registry.
    pub fn calls(&self) -> Arc<Mutex<Vec<Map<String, Value>>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Checks the calendar (test double)."
    }

    fn input_schema(&self) -> &InputSchema {
        &self.schema
    }

    async fn invoke(&self, arguments: Map<String, Value>) -> Result<String, ToolError> {
        let reply = format!(
            "Calendar is FREE at {}T{}.",
            arguments["date"].as_str().unwrap_or_default(),
            arguments["time"].as_str().unwrap_or_default()
        );
        self.calls.lock().unwrap().push(arguments);
        Ok(reply)
    }
}

pub fn registry_with(tool: RecordingTool) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(tool));
    registry
}

/// A well-formed availability action.
pub const CHECK_ACTION: &str = "Thought: I should look at the calendar.\n\
Action: check_calendar_availability\n\
Action Input: {\"date\": \"2025-12-15\", \"time\": \"09:00:00\", \"duration_minutes\": 60}";
