//! Calendar collaborator: free/busy lookups and event creation.
//!
//! [`GraphCalendarClient`] talks to Microsoft Graph. The tools only see the
//! [`CalendarClient`] trait, so tests swap in a recording fake.

use async_trait::async_trait;
use calagent_config::CalendarConfig;
use calagent_core::error::CalendarError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::credentials::CredentialProvider;

/// Wire format for local timestamps, e.g. `2025-12-15T09:00:00`.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A local time range; the timezone comes from the client's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// An event to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub subject: String,
    pub slot: TimeSlot,
    pub attendees: Vec<String>,
}

/// A `dateTime` / `timeZone` pair as Graph represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    pub date_time: String,
    pub time_zone: String,
}

/// One busy entry in a free/busy schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub start: Option<DateTimeTimeZone>,
    #[serde(default)]
    pub end: Option<DateTimeTimeZone>,
}

/// The event as echoed back by the calendar after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    #[serde(default)]
    pub id: Option<String>,
    pub subject: String,
    pub start: DateTimeTimeZone,
}

/// The two calendar operations the tools need.
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// Schedule items overlapping `slot`; empty means free.
    async fn get_schedule(&self, slot: &TimeSlot) -> Result<Vec<ScheduleItem>, CalendarError>;

    /// Create an event and return what the calendar stored.
    async fn create_event(&self, event: &NewEvent) -> Result<CreatedEvent, CalendarError>;
}

/// Microsoft Graph implementation of [`CalendarClient`].
pub struct GraphCalendarClient {
    base_url: String,
    mailbox: String,
    timezone: String,
    availability_interval_minutes: u32,
    online_meeting: bool,
    credentials: Arc<dyn CredentialProvider>,
    client: reqwest::Client,
}

impl GraphCalendarClient {
    pub fn new(
        config: &CalendarConfig,
        credentials: Arc<dyn CredentialProvider>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: config.graph_url.trim_end_matches('/').to_string(),
            mailbox: config.mailbox.clone(),
            timezone: config.timezone.clone(),
            availability_interval_minutes: config.availability_interval_minutes,
            online_meeting: config.online_meeting,
            credentials,
            client,
        }
    }

    fn stamp(&self, at: &NaiveDateTime) -> DateTimeTimeZone {
        DateTimeTimeZone {
            date_time: at.format(DATE_TIME_FORMAT).to_string(),
            time_zone: self.timezone.clone(),
        }
    }

    fn schedule_body(&self, slot: &TimeSlot) -> serde_json::Value {
        serde_json::json!({
            "schedules": [self.mailbox],
            "startTime": self.stamp(&slot.start),
            "endTime": self.stamp(&slot.end),
            "availabilityViewInterval": self.availability_interval_minutes,
        })
    }

    fn event_body(&self, event: &NewEvent) -> serde_json::Value {
        let attendees: Vec<serde_json::Value> = event
            .attendees
            .iter()
            .map(|address| {
                serde_json::json!({
                    "emailAddress": {"address": address},
                    "type": "required",
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "subject": event.subject,
            "start": self.stamp(&event.slot.start),
            "end": self.stamp(&event.slot.end),
            "attendees": attendees,
            "isOnlineMeeting": self.online_meeting,
        });
        if self.online_meeting {
            body["onlineMeetingProvider"] = serde_json::json!("teamsForBusiness");
        }
        body
    }

    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, CalendarError> {
        let token = self.credentials.bearer_token().await?;
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "Calling calendar API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CalendarError::Network(format!("request timed out: {e}"))
                } else {
                    CalendarError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if response.status().is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        warn!(status, url = %url, "Calendar API returned an error");
        Err(match status {
            401 | 403 => CalendarError::Unauthorized(message),
            409 => CalendarError::Conflict(message),
            _ => CalendarError::Api {
                status_code: status,
                message,
            },
        })
    }
}

#[async_trait]
impl CalendarClient for GraphCalendarClient {
    async fn get_schedule(&self, slot: &TimeSlot) -> Result<Vec<ScheduleItem>, CalendarError> {
        let response = self
            .post("/me/calendar/getSchedule", &self.schedule_body(slot))
            .await?;

        let schedule: ScheduleResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::Decode(e.to_string()))?;

        Ok(schedule
            .value
            .into_iter()
            .next()
            .map(|info| info.schedule_items)
            .unwrap_or_default())
    }

    async fn create_event(&self, event: &NewEvent) -> Result<CreatedEvent, CalendarError> {
        let response = self.post("/me/events", &self.event_body(event)).await?;
        response
            .json()
            .await
            .map_err(|e| CalendarError::Decode(e.to_string()))
    }
}

/// Build an HTTP client for calendar and token requests.
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    value: Vec<ScheduleInformation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleInformation {
    #[serde(default)]
    schedule_items: Vec<ScheduleItem>,
}
