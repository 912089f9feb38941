use almanac_core::model::{Event, EventFields, RecurrenceRule};

use crate::model::event::{EventChangeset, EventRecord, NewEvent};

impl EventRecord {
    /// Combines the row with its already-loaded recurrence rule.
    #[must_use]
    pub fn into_event(self, recurrence: Option<RecurrenceRule>) -> Event {
        Event {
            id: self.id,
            user_id: self.user_id,
            calendar_id: self.calendar_id,
            title: self.title,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            color: self.color,
            is_all_day: self.is_all_day,
            recurrence,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl<'a> NewEvent<'a> {
    #[must_use]
    pub fn new(
        id: uuid::Uuid,
        user_id: uuid::Uuid,
        calendar_id: uuid::Uuid,
        recurrence_id: Option<uuid::Uuid>,
        fields: &'a EventFields,
    ) -> Self {
        Self {
            id,
            user_id,
            calendar_id,
            recurrence_id,
            title: &fields.title,
            description: &fields.description,
            start_time: fields.start_time,
            end_time: fields.end_time,
            color: fields.color.as_deref(),
            is_all_day: fields.is_all_day,
        }
    }
}

impl<'a> EventChangeset<'a> {
    #[must_use]
    pub fn new(
        calendar_id: uuid::Uuid,
        recurrence_id: Option<uuid::Uuid>,
        fields: &'a EventFields,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            calendar_id,
            recurrence_id,
            title: &fields.title,
            description: &fields.description,
            start_time: fields.start_time,
            end_time: fields.end_time,
            color: fields.color.as_deref(),
            is_all_day: fields.is_all_day,
            updated_at: now,
        }
    }
}
