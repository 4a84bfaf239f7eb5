//! Action validation and dispatch.
//!
//! Every call produces exactly one observation message, whatever goes wrong.

use calagent_core::message::Message;
use calagent_core::tool::ToolRegistry;
use tracing::{debug, warn};

use crate::parser::{OBSERVATION, parse_action};

/// Parse the action in `content`, run the tool and wrap the outcome as an
/// `Observation:` assistant message.
pub async fn dispatch(tools: &ToolRegistry, content: &str) -> Message {
    Message::assistant(format!("{OBSERVATION} {}", observe(tools, content).await))
}

async fn observe(tools: &ToolRegistry, content: &str) -> String {
    let request = parse_action(content);
    let (Some(tool_name), Some(raw)) = (request.tool_name, request.raw_arguments) else {
        warn!("Action lines missing or empty");
        return "Invalid tool format.".into();
    };

    let arguments: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(tool = %tool_name, error = %e, "Action input is not valid JSON");
            return format!("Invalid JSON: {raw}");
        }
    };

    let Some(tool) = tools.lookup(&tool_name) else {
        warn!(tool = %tool_name, "Model asked for an unknown tool");
        return format!("Unknown tool: {tool_name}");
    };

    match tool.validate_and_invoke(&arguments).await {
        Ok(result) => {
            debug!(tool = %tool_name, "Tool invoked");
            result
        }
        Err(e) => {
            warn!(tool = %tool_name, error = %e, "Tool call rejected");
            format!("Tool Error: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{RecordingTool, registry_with};
    use calagent_core::message::Role;

    fn action(name: &str, input: &str) -> String {
        format!("Thought: let me check\nAction: {name}\nAction Input: {input}")
    }

    #[tokio::test]
    async fn successful_call_becomes_observation() {
        let tool = RecordingTool::new("check_calendar_availability");
        let calls = tool.calls();
        let tools = registry_with(tool);

        let message = dispatch(
            &tools,
            &action(
                "check_calendar_availability",
                r#"{"date": "2025-12-15", "time": "09:00:00", "duration_minutes": 30}"#,
            ),
        )
        .await;

        assert_eq!(message.role, Role::Assistant);
        assert_eq!(
            message.content,
            "Observation: Calendar is FREE at 2025-12-15T09:00:00."
        );
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_input_line_is_invalid_format() {
        let tools = registry_with(RecordingTool::new("check_calendar_availability"));
        let message = dispatch(&tools, "Action: check_calendar_availability").await;
        assert_eq!(message.content, "Observation: Invalid tool format.");
    }

    #[tokio::test]
    async fn inline_markers_route_to_dispatch_but_are_invalid_format() {
        let text = "I will use Action: check_calendar_availability with Action Input: {}";
        assert_eq!(
            crate::router::route(text, 1, 5),
            crate::router::RouteDecision::DispatchAction
        );

        let tool = RecordingTool::new("check_calendar_availability");
        let calls = tool.calls();
        let tools = registry_with(tool);
        let message = dispatch(&tools, text).await;
        assert_eq!(message.content, "Observation: Invalid tool format.");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_names_the_payload() {
        let tools = registry_with(RecordingTool::new("check_calendar_availability"));
        let message = dispatch(
            &tools,
            &action("check_calendar_availability", "{date: tomorrow}"),
        )
        .await;
        assert_eq!(message.content, "Observation: Invalid JSON: {date: tomorrow}");
    }

    #[tokio::test]
    async fn unknown_tool_is_named() {
        let tools = registry_with(RecordingTool::new("check_calendar_availability"));
        let message = dispatch(&tools, &action("cancel_meeting", "{}")).await;
        assert_eq!(message.content, "Observation: Unknown tool: cancel_meeting");
    }

    #[tokio::test]
    async fn schema_failure_is_tool_error() {
        let tool = RecordingTool::new("check_calendar_availability");
        let calls = tool.calls();
        let tools = registry_with(tool);

        let message = dispatch(
            &tools,
            &action(
                "check_calendar_availability",
                r#"{"date": "2025-12-15", "time": "09:00:00"}"#,
            ),
        )
        .await;

        assert_eq!(
            message.content,
            "Observation: Tool Error: missing required field 'duration_minutes'"
        );
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_object_json_is_tool_error() {
        let tools = registry_with(RecordingTool::new("check_calendar_availability"));
        let message = dispatch(&tools, &action("check_calendar_availability", "[1, 2]")).await;
        assert!(message.content.starts_with("Observation: Tool Error: "));
        assert!(message.content.contains("JSON object"));
    }

    #[tokio::test]
    async fn extra_field_is_tool_error() {
        let tools = registry_with(RecordingTool::new("check_calendar_availability"));
        let message = dispatch(
            &tools,
            &action(
                "check_calendar_availability",
                r#"{"date": "2025-12-15", "time": "09:00:00", "duration_minutes": 30, "room": "B"}"#,
            ),
        )
        .await;
        assert_eq!(
            message.content,
            "Observation: Tool Error: unknown field 'room'"
        );
    }
}
