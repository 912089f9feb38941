//! Request and response bodies for the event endpoints.

use almanac_core::model::{Calendar, Event, EventFields, RecurrenceInput, RecurrenceRule, User};
use almanac_core::validation::ValidationErrors;
use almanac_service::event::{EventInput, EventListing};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create and update body. The recurrence fields sit at the top level next to
/// the event fields.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub calendar_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(flatten)]
    pub recurrence: RecurrenceInput,
}

impl EventRequest {
    /// ## Errors
    /// Returns field errors for recurrence values that cannot be typed.
    pub fn into_input(self) -> Result<EventInput, ValidationErrors> {
        Ok(EventInput {
            calendar_id: self.calendar_id,
            fields: EventFields {
                title: self.title,
                description: self.description,
                start_time: self.start_time,
                end_time: self.end_time,
                color: self.color,
                is_all_day: self.is_all_day,
            },
            recurrence: self.recurrence.into_bundle()?,
        })
    }
}

/// One event as returned by detail, create and update.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub calendar_id: Uuid,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub color: Option<String>,
    pub is_all_day: bool,
    pub recurrence: Option<RecurrenceRule>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            calendar_id: event.calendar_id,
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
pub struct OwnerSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub color: String,
    pub is_visible: bool,
}

impl From<Calendar> for CalendarSummary {
    fn from(calendar: Calendar) -> Self {
        Self {
            id: calendar.id,
            name: calendar.name,
            description: calendar.description,
            color: calendar.color,
            is_visible: calendar.is_visible,
        }
    }
}

/// One row of the event list, with owner and calendar inlined.
#[derive(Debug, Serialize)]
pub struct EventListItem {
    pub id: Uuid,
    pub user: OwnerSummary,
    pub calendar: Option<CalendarSummary>,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub color: Option<String>,
    pub is_all_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub recurrence: Option<RecurrenceRule>,
}

impl EventListItem {
    #[must_use]
    pub fn new(listing: EventListing, owner: &User) -> Self {
        let EventListing { event, calendar } = listing;
        Self {
            id: event.id,
            user: owner.into(),
            calendar: calendar.map(Into::into),
            title: event.title,
            description: event.description,
            start_time: event.start_time,
            end_time: event.end_time,
            color: event.color,
            is_all_day: event.is_all_day,
            created_at: event.created_at,
            updated_at: event.updated_at,
            recurrence: event.recurrence,
        }
    }
}
