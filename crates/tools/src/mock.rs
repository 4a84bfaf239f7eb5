//! Recording calendar fake for tool tests.

use async_trait::async_trait;
use calagent_core::error::CalendarError;
use std::sync::Mutex;

use crate::calendar::{
    CalendarClient, CreatedEvent, DATE_TIME_FORMAT, DateTimeTimeZone, NewEvent, ScheduleItem,
    TimeSlot,
};

#[derive(Debug, Clone)]
pub enum CalendarCall {
    GetSchedule(TimeSlot),
    CreateEvent(NewEvent),
}

/// Records every call and answers from a fixed script.
pub struct RecordingCalendar {
    busy: bool,
    failure: Option<CalendarError>,
    calls: Mutex<Vec<CalendarCall>>,
}

impl RecordingCalendar {
    pub fn free() -> Self {
        Self {
            busy: false,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn busy() -> Self {
        Self {
            busy: true,
            ..Self::free()
        }
    }

    pub fn failing(error: CalendarError) -> Self {
        Self {
            failure: Some(error),
            ..Self::free()
        }
    }

    pub fn calls(&self) -> Vec<CalendarCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: CalendarCall) -> Result<(), CalendarError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CalendarClient for RecordingCalendar {
    async fn get_schedule(&self, slot: &TimeSlot) -> Result<Vec<ScheduleItem>, CalendarError> {
        self.record(CalendarCall::GetSchedule(*slot))?;
        if !self.busy {
            return Ok(Vec::new());
        }
        Ok(vec![ScheduleItem {
            status: "busy".into(),
            subject: Some("Standup".into()),
            start: None,
            end: None,
        }])
    }

    async fn create_event(&self, event: &NewEvent) -> Result<CreatedEvent, CalendarError> {
        self.record(CalendarCall::CreateEvent(event.clone()))?;
        Ok(CreatedEvent {
            id: Some("evt-1".into()),
            subject: event.subject.clone(),
            start: DateTimeTimeZone {
                date_time: event.slot.start.format(DATE_TIME_FORMAT).to_string(),
                time_zone: "America/Chicago".into(),
            },
        })
    }
}
