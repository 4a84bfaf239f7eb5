//! Action parser for the `Thought / Action / Action Input / Final Answer`
//! text convention.
//!
//! Parsing is line-oriented: every line is trimmed and matched against the
//! marker prefixes case-sensitively. When a marker line appears more than
//! once, the last one wins.

/// Marker that starts the answer meant for the user.
pub const FINAL_ANSWER: &str = "Final Answer:";
/// Marker naming the tool to call.
pub const ACTION: &str = "Action:";
/// Marker carrying the tool arguments as a JSON object.
pub const ACTION_INPUT: &str = "Action Input:";
/// Prefix of tool results fed back to the model.
pub const OBSERVATION: &str = "Observation:";

/// A tool call as written by the model, before any validation.
///
/// Either half may be missing when the marker lines are absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallRequest {
    pub tool_name: Option<String>,
    pub raw_arguments: Option<String>,
}

/// Text after the last `Final Answer:` marker, trimmed.
pub fn extract_final_answer(text: &str) -> Option<String> {
    text.rfind(FINAL_ANSWER)
        .map(|at| text[at + FINAL_ANSWER.len()..].trim().to_string())
}

/// Pull the `Action:` and `Action Input:` lines out of a model message.
pub fn parse_action(text: &str) -> ToolCallRequest {
    let mut request = ToolCallRequest::default();

    for line in text.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix(ACTION_INPUT) {
            request.raw_arguments = non_empty(strip_argument(rest));
        } else if let Some(rest) = line.strip_prefix(ACTION) {
            request.tool_name = non_empty(rest.trim().to_string());
        }
    }

    request
}

/// Remove the decoration models like to wrap arguments in: surrounding
/// whitespace, backticks, quotes and a leading `json` fence tag.
pub fn strip_argument(raw: &str) -> String {
    let is_wrapper = |c: char| c == '`' || c == '"' || c == '\'' || c.is_whitespace();
    let mut text = raw.trim_matches(is_wrapper);
    if let Some(rest) = text.strip_prefix("json") {
        if rest.starts_with(|c: char| c.is_whitespace() || c == '{') {
            text = rest.trim_matches(is_wrapper);
        }
    }
    text.to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_answer_is_extracted_and_trimmed() {
        let text = "Thought: I know this.\nFinal Answer:   You are free at 9.  ";
        assert_eq!(extract_final_answer(text).unwrap(), "You are free at 9.");
    }

    #[test]
    fn final_answer_spanning_lines() {
        let text = "Final Answer: Booked.\nInvites went to both attendees.";
        assert_eq!(
            extract_final_answer(text).unwrap(),
            "Booked.\nInvites went to both attendees."
        );
    }

    #[test]
    fn final_answer_uses_last_marker() {
        let text = "Final Answer: draft\nFinal Answer: real";
        assert_eq!(extract_final_answer(text).unwrap(), "real");
    }

    #[test]
    fn action_lines_are_extracted() {
        let text = "Thought: need to check\n\
                    Action: check_calendar_availability\n\
                    Action Input: {\"date\": \"2025-12-15\", \"time\": \"09:00:00\", \"duration_minutes\": 60}";
        let request = parse_action(text);
        assert_eq!(
            request.tool_name.as_deref(),
            Some("check_calendar_availability")
        );
        assert!(request.raw_arguments.unwrap().starts_with('{'));
    }

    #[test]
    fn indented_marker_lines_are_accepted() {
        let request = parse_action("   Action: schedule_new_meeting  \n\tAction Input: {}");
        assert_eq!(request.tool_name.as_deref(), Some("schedule_new_meeting"));
        assert_eq!(request.raw_arguments.as_deref(), Some("{}"));
    }

    #[test]
    fn last_action_wins() {
        let text = "Action: first\nAction Input: {\"a\": 1}\nAction: second\nAction Input: {\"b\": 2}";
        let request = parse_action(text);
        assert_eq!(request.tool_name.as_deref(), Some("second"));
        assert_eq!(request.raw_arguments.as_deref(), Some("{\"b\": 2}"));
    }

    #[test]
    fn markers_are_case_sensitive() {
        let request = parse_action("action: check\naction input: {}");
        assert!(request.tool_name.is_none());
        assert!(request.raw_arguments.is_none());
    }

    #[test]
    fn backticks_and_quotes_are_stripped() {
        assert_eq!(strip_argument(" `{\"a\": 1}` "), "{\"a\": 1}");
        assert_eq!(strip_argument("'{\"a\": 1}'"), "{\"a\": 1}");
        assert_eq!(strip_argument("```json {\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn empty_name_is_missing() {
        let request = parse_action("Action:   \nAction Input: {}");
        assert!(request.tool_name.is_none());
        assert_eq!(request.raw_arguments.as_deref(), Some("{}"));
    }

    #[test]
    fn plain_text_has_no_markers() {
        assert!(extract_final_answer("Let me think about that.").is_none());
        assert_eq!(parse_action("Let me think about that."), ToolCallRequest::default());
    }
}
