use almanac_core::model::calendar::DEFAULT_COLOR;
use almanac_core::model::{Calendar, CalendarFields, Event, RecurrenceRule};
use almanac_service::calendar::CalendarDetail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

const fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CalendarRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

impl From<CalendarRequest> for CalendarFields {
    fn from(body: CalendarRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            color: body.color,
            is_visible: body.is_visible,
        }
    }
}

/// Event as nested inside a calendar.
#[derive(Debug, Serialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub color: Option<String>,
    pub is_all_day: bool,
    pub recurrence: Option<RecurrenceRule>,
}

impl From<Event> for CalendarEvent {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            start_time: event.start_time,
            end_time: event.end_time,
            color: event.color,
            is_all_day: event.is_all_day,
            recurrence: event.recurrence,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub color: String,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<CalendarEvent>>,
}

impl From<Calendar> for CalendarResponse {
    fn from(calendar: Calendar) -> Self {
        Self {
            id: calendar.id,
            name: calendar.name,
            description: calendar.description,
            color: calendar.color,
            is_visible: calendar.is_visible,
            created_at: calendar.created_at,
            updated_at: calendar.updated_at,
            events: None,
        }
    }
}

impl From<CalendarDetail> for CalendarResponse {
    fn from(detail: CalendarDetail) -> Self {
        let events = detail.events.into_iter().map(Into::into).collect();
        Self {
            events: Some(events),
            ..Self::from(detail.calendar)
        }
    }
}
