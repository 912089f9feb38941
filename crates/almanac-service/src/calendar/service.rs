//! ## Summary
//! Owner-scoped calendar operations.
//!
//! Reads return each calendar with its events so clients can render a whole
//! calendar from one response.

use std::collections::HashMap;

use almanac_core::model::{Calendar, CalendarFields, Event};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{CalendarStore, EventStore, Store};

#[derive(Debug, Clone)]
pub struct CalendarDetail {
    pub calendar: Calendar,
    pub events: Vec<Event>,
}

/// ## Errors
/// Returns an error if the store fails.
#[tracing::instrument(skip(store))]
pub async fn list_calendars(store: &dyn Store, owner: Uuid) -> ServiceResult<Vec<CalendarDetail>> {
    let calendars = store.list_calendars(owner).await?;

    let mut grouped: HashMap<Uuid, Vec<Event>> = HashMap::new();
    for event in store.list_events(owner).await? {
        grouped.entry(event.calendar_id).or_default().push(event);
    }

    Ok(calendars
        .into_iter()
        .map(|calendar| CalendarDetail {
            events: grouped.remove(&calendar.id).unwrap_or_default(),
            calendar,
        })
        .collect())
}

/// ## Errors
/// Returns `NotFound` if the calendar does not exist or belongs to someone else.
#[tracing::instrument(skip(store))]
pub async fn get_calendar(
    store: &dyn Store,
    owner: Uuid,
    calendar_id: Uuid,
) -> ServiceResult<CalendarDetail> {
    let calendar = store
        .get_calendar(calendar_id, owner)
        .await?
        .ok_or_else(ServiceError::calendar_not_found)?;
    let events = store.list_calendar_events(calendar_id, owner).await?;
    Ok(CalendarDetail { calendar, events })
}

/// ## Errors
/// Returns `ValidationError` if the name or color is invalid.
#[tracing::instrument(skip(store, fields))]
pub async fn create_calendar(
    store: &dyn Store,
    owner: Uuid,
    fields: CalendarFields,
) -> ServiceResult<CalendarDetail> {
    fields.validate()?;
    let calendar = store.insert_calendar(owner, &fields).await?;
    tracing::info!(calendar_id = %calendar.id, "Calendar created");
    Ok(CalendarDetail {
        calendar,
        events: Vec::new(),
    })
}

/// ## Errors
/// - `ValidationError` if the name or color is invalid
/// - `NotFound` if the calendar does not exist or belongs to someone else
#[tracing::instrument(skip(store, fields))]
pub async fn update_calendar(
    store: &dyn Store,
    owner: Uuid,
    calendar_id: Uuid,
    fields: CalendarFields,
) -> ServiceResult<Calendar> {
    fields.validate()?;
    store
        .update_calendar(calendar_id, owner, &fields)
        .await?
        .ok_or_else(ServiceError::calendar_not_found)
}

/// ## Summary
/// Deletes a calendar with its events and their rules. Deleting a missing or
/// foreign calendar succeeds without effect.
///
/// ## Errors
/// Returns an error if the store fails.
#[tracing::instrument(skip(store))]
pub async fn delete_calendar(store: &dyn Store, owner: Uuid, calendar_id: Uuid) -> ServiceResult<()> {
    if store.delete_calendar(calendar_id, owner).await? {
        tracing::info!("Calendar deleted");
    } else {
        tracing::debug!("Calendar already absent");
    }
    Ok(())
}
