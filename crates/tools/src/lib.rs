//! Calendar tools for calagent.
//!
//! Two tools are exposed to the agent: `check_calendar_availability` and
//! `schedule_new_meeting`. Both go through a [`CalendarClient`], which in
//! production is Microsoft Graph authenticated by a [`CredentialProvider`].

pub mod calendar;
pub mod check_availability;
pub mod credentials;
pub mod schedule_meeting;

#[cfg(test)]
mod mock;

use calagent_config::AppConfig;
use calagent_core::error::ToolError;
use calagent_core::tool::ToolRegistry;
use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

pub use calendar::{CalendarClient, GraphCalendarClient, NewEvent, TimeSlot};
pub use check_availability::CheckAvailabilityTool;
pub use credentials::{ClientCredentials, CredentialProvider, StaticToken};
pub use schedule_meeting::ScheduleMeetingTool;

/// Registry with both calendar tools backed by `calendar`.
pub fn default_registry(calendar: Arc<dyn CalendarClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CheckAvailabilityTool::new(calendar.clone())));
    registry.register(Box::new(ScheduleMeetingTool::new(calendar)));
    registry
}

/// Registry wired to Microsoft Graph using the `[calendar]` and
/// `[credentials]` sections of the config.
pub fn registry_from_config(config: &AppConfig) -> ToolRegistry {
    let client = calendar::http_client(Duration::from_secs(config.calendar.timeout_secs));
    let credentials = credentials::from_config(&config.credentials, client.clone());
    let calendar = GraphCalendarClient::new(&config.calendar, credentials, client);
    default_registry(Arc::new(calendar))
}

/// Turn schema-validated arguments into a typed input struct.
pub(crate) fn decode_arguments<T: DeserializeOwned>(
    arguments: Map<String, Value>,
) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Build the slot starting at `date`T`time` and lasting `duration_minutes`.
///
/// `time` may be `HH:MM:SS` or `HH:MM`.
pub(crate) fn parse_slot(
    date: &str,
    time: &str,
    duration_minutes: i64,
) -> Result<TimeSlot, ToolError> {
    if duration_minutes <= 0 {
        return Err(ToolError::InvalidArguments(format!(
            "duration_minutes must be positive, got {duration_minutes}"
        )));
    }

    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        ToolError::InvalidArguments(format!("date '{date}' must look like 2025-12-15"))
    })?;
    let clock = NaiveTime::parse_from_str(time.trim(), "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M"))
        .map_err(|_| {
            ToolError::InvalidArguments(format!("time '{time}' must look like 09:00:00"))
        })?;

    let start = day.and_time(clock);
    let end = chrono::Duration::try_minutes(duration_minutes)
        .and_then(|d| start.checked_add_signed(d))
        .ok_or_else(|| {
            ToolError::InvalidArguments(format!("duration_minutes {duration_minutes} is too large"))
        })?;

    Ok(TimeSlot { start, end })
}
