//! ## Summary
//! Events and their editable fields.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::recurrence::RecurrenceRule;
use crate::validation::{ValidationErrors, is_hex_color};

pub const TITLE_MAX_LEN: usize = 255;

/// ## Summary
/// The fields an owner sets on every create and update.
///
/// An update overwrites all of them unconditionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub color: Option<String>,
    pub is_all_day: bool,
}

impl EventFields {
    /// ## Summary
    /// Trims the title and collapses an empty color to `None`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.color = self
            .color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }

    /// ## Summary
    /// Checks the title length, the time ordering and the color format.
    ///
    /// ## Errors
    /// Returns every failed check as a field error.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.push("title", "This field may not be blank.");
        } else if self.title.chars().count() > TITLE_MAX_LEN {
            errors.push(
                "title",
                format!("Ensure this field has no more than {TITLE_MAX_LEN} characters."),
            );
        }

        if self.end_time <= self.start_time {
            errors.push("end_time", "End time must be after start time.");
        }

        if let Some(color) = &self.color
            && !is_hex_color(color)
        {
            errors.push("color", "Enter a color in #RRGGBB format.");
        }

        errors.into_result()
    }
}

/// An event as stored, with its recurrence definition resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub calendar_id: Uuid,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub color: Option<String>,
    pub is_all_day: bool,
    pub recurrence: Option<RecurrenceRule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Overwrites every editable field.
    pub fn assign(&mut self, calendar_id: Uuid, fields: EventFields) {
        self.calendar_id = calendar_id;
        self.title = fields.title;
        self.description = fields.description;
        self.start_time = fields.start_time;
        self.end_time = fields.end_time;
        self.color = fields.color;
        self.is_all_day = fields.is_all_day;
    }
}
