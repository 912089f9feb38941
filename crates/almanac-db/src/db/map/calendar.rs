use almanac_core::model::{Calendar, CalendarFields};

use crate::model::calendar::{CalendarChangeset, CalendarRecord, NewCalendar};

impl From<CalendarRecord> for Calendar {
    fn from(record: CalendarRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            description: record.description,
            color: record.color,
            is_visible: record.is_visible,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl<'a> NewCalendar<'a> {
    #[must_use]
    pub fn from_fields(id: uuid::Uuid, user_id: uuid::Uuid, fields: &'a CalendarFields) -> Self {
        Self {
            id,
            user_id,
            name: fields.name.trim(),
            description: &fields.description,
            color: &fields.color,
            is_visible: fields.is_visible,
        }
    }
}

impl<'a> CalendarChangeset<'a> {
    #[must_use]
    pub fn from_fields(fields: &'a CalendarFields, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            name: fields.name.trim(),
            description: &fields.description,
            color: &fields.color,
            is_visible: fields.is_visible,
            updated_at: now,
        }
    }
}
