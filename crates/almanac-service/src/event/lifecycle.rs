//! ## Summary
//! Orchestrates event writes.
//!
//! Validation happens up front and collects every field error; the store then
//! performs the event and rule writes as one unit of work. Nothing here retries
//! or recovers: the first failure aborts the operation.

use std::collections::HashMap;

use almanac_core::model::{Calendar, Event, EventFields, RecurrenceBundle};
use almanac_core::validation::ValidationErrors;
use uuid::Uuid;

use super::recurrence::RecurrenceChange;
use crate::error::{ServiceError, ServiceResult};
use crate::store::{CalendarStore, EventInsert, EventStore, EventUpdate, Store};

/// A create or update request for one event.
#[derive(Debug, Clone)]
pub struct EventInput {
    pub calendar_id: Uuid,
    pub fields: EventFields,
    pub recurrence: RecurrenceBundle,
}

/// An event with the calendar it belongs to.
#[derive(Debug, Clone)]
pub struct EventListing {
    pub event: Event,
    pub calendar: Option<Calendar>,
}

async fn require_calendar(store: &dyn Store, calendar_id: Uuid, owner: Uuid) -> ServiceResult<()> {
    store
        .get_calendar(calendar_id, owner)
        .await?
        .map(|_calendar| ())
        .ok_or_else(ServiceError::calendar_not_found)
}

/// ## Summary
/// Creates an event, attaching a new recurrence rule when the bundle is present.
///
/// ## Side Effects
/// - Inserts the rule (if any) and the event in one transaction
///
/// ## Errors
/// - `ValidationError` for invalid fields or an invalid recurrence definition
/// - `NotFound` if the calendar does not exist or belongs to someone else
#[tracing::instrument(skip(store, input), fields(calendar_id = %input.calendar_id))]
pub async fn create_event(store: &dyn Store, owner: Uuid, input: EventInput) -> ServiceResult<Event> {
    let fields = input.fields.normalized();

    let mut errors = ValidationErrors::new();
    errors.capture(fields.validate());
    let recurrence = errors
        .capture(RecurrenceChange::plan_create(&input.recurrence))
        .flatten();
    errors.into_result()?;

    require_calendar(store, input.calendar_id, owner).await?;

    let event = store
        .insert_event(EventInsert {
            owner,
            calendar_id: input.calendar_id,
            fields,
            recurrence,
        })
        .await?;

    tracing::info!(
        event_id = %event.id,
        recurring = event.recurrence.is_some(),
        "Event created"
    );

    Ok(event)
}

/// ## Summary
/// Overwrites an event's fields and attaches, patches or detaches its rule
/// according to the bundle.
///
/// ## Side Effects
/// - Inserts, updates or deletes the rule and updates the event in one transaction
///
/// ## Errors
/// - `NotFound` if the event or the target calendar is missing or foreign
/// - `ValidationError` for invalid fields or an invalid merged definition
#[tracing::instrument(skip(store, input), fields(calendar_id = %input.calendar_id))]
pub async fn update_event(
    store: &dyn Store,
    owner: Uuid,
    event_id: Uuid,
    input: EventInput,
) -> ServiceResult<Event> {
    let existing = store
        .get_event(event_id, owner)
        .await?
        .ok_or_else(ServiceError::event_not_found)?;

    let fields = input.fields.normalized();

    // Checked here to report every field error at once; the store plans the
    // change again against the row it locks.
    let mut errors = ValidationErrors::new();
    errors.capture(fields.validate());
    if let Err(recurrence_errors) =
        RecurrenceChange::plan(existing.recurrence.as_ref(), &input.recurrence)
    {
        errors.merge(recurrence_errors);
    }
    errors.into_result()?;

    require_calendar(store, input.calendar_id, owner).await?;

    let event = store
        .update_event(
            event_id,
            owner,
            EventUpdate {
                calendar_id: input.calendar_id,
                fields,
                recurrence: input.recurrence,
            },
        )
        .await?
        .ok_or_else(ServiceError::event_not_found)?;

    tracing::info!(
        event_id = %event.id,
        recurring = event.recurrence.is_some(),
        "Event updated"
    );

    Ok(event)
}

/// ## Summary
/// Deletes an event and its rule.
///
/// ## Errors
/// Returns `NotFound` if the event does not exist or belongs to someone else.
#[tracing::instrument(skip(store))]
pub async fn delete_event(store: &dyn Store, owner: Uuid, event_id: Uuid) -> ServiceResult<()> {
    if store.delete_event(event_id, owner).await? {
        tracing::info!("Event deleted");
        Ok(())
    } else {
        Err(ServiceError::event_not_found())
    }
}

/// ## Errors
/// Returns `NotFound` if the event does not exist or belongs to someone else.
#[tracing::instrument(skip(store))]
pub async fn get_event(store: &dyn Store, owner: Uuid, event_id: Uuid) -> ServiceResult<Event> {
    store
        .get_event(event_id, owner)
        .await?
        .ok_or_else(ServiceError::event_not_found)
}

/// ## Errors
/// Returns an error if the store fails.
#[tracing::instrument(skip(store))]
pub async fn list_events(store: &dyn Store, owner: Uuid) -> ServiceResult<Vec<Event>> {
    store.list_events(owner).await
}

/// ## Summary
/// Lists the owner's events, newest first, each with its calendar.
///
/// ## Errors
/// Returns an error if the store fails.
#[tracing::instrument(skip(store))]
pub async fn list_events_with_calendars(
    store: &dyn Store,
    owner: Uuid,
) -> ServiceResult<Vec<EventListing>> {
    let calendars: HashMap<Uuid, Calendar> = store
        .list_calendars(owner)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(store
        .list_events(owner)
        .await?
        .into_iter()
        .map(|event| EventListing {
            calendar: calendars.get(&event.calendar_id).cloned(),
            event,
        })
        .collect())
}
