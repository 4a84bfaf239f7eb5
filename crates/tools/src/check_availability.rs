//! `check_calendar_availability`: asks the calendar whether a slot is free.

use async_trait::async_trait;
use calagent_core::error::ToolError;
use calagent_core::schema::{FieldKind, FieldSpec, InputSchema};
use calagent_core::tool::Tool;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::calendar::CalendarClient;
use crate::{decode_arguments, parse_slot};

pub const NAME: &str = "check_calendar_availability";

#[derive(Debug, Deserialize)]
struct CheckAvailabilityInput {
    date: String,
    time: String,
    duration_minutes: i64,
}

pub struct CheckAvailabilityTool {
    calendar: Arc<dyn CalendarClient>,
    schema: InputSchema,
}

impl CheckAvailabilityTool {
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
                    "The start time for the meeting in 24-hour format, e.g., '09:00:00'.",
                ),
                FieldSpec::required(
                    "duration_minutes",
                    FieldKind::Integer,
                    "Duration of the meeting in minutes, e.g., 60.",
                ),
            ]),
        }
    }
}

#[async_trait]
impl Tool for CheckAvailabilityTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Check whether the user's calendar is free at the given date and time \
         for the given duration. Returns FREE or BUSY."
    }

    fn input_schema(&self) -> &InputSchema {
        &self.schema
    }

    async fn invoke(&self, arguments: Map<String, Value>) -> Result<String, ToolError> {
        let input: CheckAvailabilityInput = decode_arguments(arguments)?;
        let slot = parse_slot(&input.date, &input.time, input.duration_minutes)?;
        let start = format!("{}T{}", input.date, input.time);

        match self.calendar.get_schedule(&slot).await {
            Ok(items) if items.is_empty() => Ok(format!("Calendar is FREE at {start}.")),
            Ok(items) => {
                debug!(busy_items = items.len(), start = %start, "Slot has conflicts");
                Ok(format!("Conflict detected at {start}. Calendar is BUSY."))
            }
            Err(e) => Ok(format!("Error checking availability: {e}")),
        }
    }
}
