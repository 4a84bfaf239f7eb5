//! System prompt construction.
//!
//! The prompt lists every tool with its arguments and spells out the
//! `Thought / Action / Action Input / Final Answer` format the parser expects.
//! It is rebuilt from the registry once and prepended to every model call;
//! it never enters the stored history.

use calagent_core::tool::ToolDescriptor;
use std::fmt::Write;

use crate::parser::{ACTION, ACTION_INPUT, FINAL_ANSWER, OBSERVATION};

pub fn system_prompt(tools: &[ToolDescriptor]) -> String {
    let mut prompt = String::from("You are a helpful calendar assistant using these tools:\n\n");

    for tool in tools {
        let _ = writeln!(prompt, "{}: {}", tool.name, tool.description);
        for field in tool.input_schema.fields() {
            let _ = writeln!(
                prompt,
                "  - {} ({}{}): {}",
                field.name,
                field.kind.expected(),
                if field.required { ", required" } else { "" },
                field.description
            );
        }
        prompt.push('\n');
    }

    let _ = write!(
        prompt,
        "Follow the ReAct format:\n\
         \n\
         Thought: reason about what to do next\n\
         {ACTION} the tool name, exactly as listed above\n\
         {ACTION_INPUT} the arguments as a single-line JSON object\n\
         {OBSERVATION} the tool result, which is given to you; never write it yourself\n\
         ... (Thought / Action / Action Input / Observation may repeat)\n\
         {FINAL_ANSWER} the answer for the user\n\
         \n\
         Only call tools when needed. Always finish with a line starting with \"{FINAL_ANSWER}\"."
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{RecordingTool, registry_with};

    #[test]
    fn prompt_lists_tools_and_fields() {
        let registry = registry_with(RecordingTool::new("check_calendar_availability"));
        let prompt = system_prompt(&registry.descriptors());

        assert!(prompt.contains("check_calendar_availability: Checks the calendar"));
        assert!(prompt.contains("  - duration_minutes (an integer, required): Length"));
    }

    #[test]
    fn prompt_describes_the_format() {
        let prompt = system_prompt(&[]);
        for marker in ["Thought:", "Action:", "Action Input:", "Observation:", "Final Answer:"] {
            assert!(prompt.contains(marker), "missing {marker}");
        }
    }
}
