//! `schedule_new_meeting`: creates an event with required attendees.

use async_trait::async_trait;
use calagent_core::error::ToolError;
use calagent_core::schema::{FieldKind, FieldSpec, InputSchema};
use calagent_core::tool::Tool;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

use crate::calendar::{CalendarClient, NewEvent};
use crate::{decode_arguments, parse_slot};

pub const NAME: &str = "schedule_new_meeting";

#[derive(Debug, Deserialize)]
struct ScheduleMeetingInput {
    date: String,
    time: String,
    duration_minutes: i64,
    attendees: Vec<String>,
    subject: String,
}

pub struct ScheduleMeetingTool {
    calendar: Arc<dyn CalendarClient>,
    schema: InputSchema,
}

impl ScheduleMeetingTool {
    pub fn new(calendar: Arc<dyn CalendarClient>) -> Self {
        Self {
            calendar,
            schema: InputSchema::new(vec![
                FieldSpec::required(
                    "date",
                    FieldKind::String,
                    "The date for the meeting, e.g., '2025-12-15'.",
                ),
                FieldSpec::required(
                    "time",
                    FieldKind::String,
                    "The start time for the meeting in 24-hour format, e.g., '14:00:00'.",
                ),
                FieldSpec::required(
                    "duration_minutes",
                    FieldKind::Integer,
                    "Duration of the meeting in minutes, e.g., 60.",
                ),
                FieldSpec::required(
                    "attendees",
                    FieldKind::StringList,
                    "List of attendee email addresses.",
                ),
                FieldSpec::required("subject", FieldKind::String, "Meeting subject."),
            ]),
        }
    }
}

#[async_trait]
impl Tool for ScheduleMeetingTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Schedule a new online meeting on the user's calendar with the given \
         attendees, subject, date, time and duration. Returns a confirmation."
    }

    fn input_schema(&self) -> &InputSchema {
        &self.schema
    }

    async fn invoke(&self, arguments: Map<String, Value>) -> Result<String, ToolError> {
        let input: ScheduleMeetingInput = decode_arguments(arguments)?;
        let slot = parse_slot(&input.date, &input.time, input.duration_minutes)?;

        let event = NewEvent {
            subject: input.subject,
            slot,
            attendees: input.attendees,
        };

        match self.calendar.create_event(&event).await {
            Ok(created) => {
                info!(subject = %created.subject, start = %created.start.date_time, "Meeting scheduled");
                Ok(format!(
                    "Meeting scheduled: {} at {}",
                    created.subject, created.start.date_time
                ))
            }
            Err(e) => Ok(format!("Error scheduling meeting: {e}")),
        }
    }
}
