//! Event statements. Every lookup is scoped by owner; listings are ordered by
//! start time, newest first.

use std::collections::HashMap;

use almanac_core::model::{Event, RecurrenceRule};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::event;
use crate::model::event::{EventChangeset, EventRecord, NewEvent};

use super::recurrence;

/// ## Summary
/// Returns a query for all events owned by `user_id`.
#[must_use]
pub fn owned_by(user_id: uuid::Uuid) -> event::BoxedQuery<'static, diesel::pg::Pg> {
    event::table
        .filter(event::user_id.eq(user_id))
        .order((event::start_time.desc(), event::id.asc()))
        .into_boxed()
}

/// ## Summary
/// Returns a query for the owner's events in one calendar.
#[must_use]
pub fn in_calendar(
    calendar_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> event::BoxedQuery<'static, diesel::pg::Pg> {
    owned_by(user_id).filter(event::calendar_id.eq(calendar_id))
}

/// ## Summary
/// Returns a query for one event, visible only to its owner.
#[must_use]
pub fn by_id_for_owner(
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> event::BoxedQuery<'static, diesel::pg::Pg> {
    event::table
        .filter(event::id.eq(id))
        .filter(event::user_id.eq(user_id))
        .into_boxed()
}

/// ## Summary
/// Loads the rules linked by `records` and assembles domain events, keeping
/// the order of `records`.
///
/// ## Errors
/// Returns a database error if the rule query fails.
pub async fn with_recurrence(
    conn: &mut AsyncPgConnection,
    records: Vec<EventRecord>,
) -> QueryResult<Vec<Event>> {
    let rule_ids: Vec<uuid::Uuid> = records.iter().filter_map(|r| r.recurrence_id).collect();
    let mut rules: HashMap<uuid::Uuid, RecurrenceRule> = recurrence::load_many(conn, &rule_ids)
        .await?
        .into_iter()
        .map(|record| (record.id, RecurrenceRule::from(record)))
        .collect();

    Ok(records
        .into_iter()
        .map(|record| {
            let rule = record.recurrence_id.and_then(|id| rules.remove(&id));
            record.into_event(rule)
        })
        .collect())
}

/// ## Errors
/// Returns a database error if a query fails.
pub async fn list(conn: &mut AsyncPgConnection, user_id: uuid::Uuid) -> QueryResult<Vec<Event>> {
    let records = owned_by(user_id)
        .select(EventRecord::as_select())
        .load(conn)
        .await?;
    with_recurrence(conn, records).await
}

/// ## Errors
/// Returns a database error if a query fails.
pub async fn list_in_calendar(
    conn: &mut AsyncPgConnection,
    calendar_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Vec<Event>> {
    let records = in_calendar(calendar_id, user_id)
        .select(EventRecord::as_select())
        .load(conn)
        .await?;
    with_recurrence(conn, records).await
}

/// ## Errors
/// Returns a database error if a query fails.
pub async fn find(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Option<Event>> {
    let Some(record) = by_id_for_owner(id, user_id)
        .select(EventRecord::as_select())
        .first(conn)
        .await
        .optional()?
    else {
        return Ok(None);
    };
    Ok(with_recurrence(conn, vec![record]).await?.pop())
}

/// ## Summary
/// Returns a query for one owned event that takes a row lock, so concurrent
/// writers of the same event run one after the other.
#[must_use]
pub fn by_id_for_owner_locked(
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> diesel::dsl::ForUpdate<
    diesel::dsl::Select<
        diesel::dsl::Filter<
            diesel::dsl::Filter<event::table, diesel::dsl::Eq<event::id, uuid::Uuid>>,
            diesel::dsl::Eq<event::user_id, uuid::Uuid>,
        >,
        diesel::dsl::AsSelect<EventRecord, diesel::pg::Pg>,
    >,
> {
    event::table
        .filter(event::id.eq(id))
        .filter(event::user_id.eq(user_id))
        .select(EventRecord::as_select())
        .for_update()
}

/// ## Summary
/// Like [`find`], but holds the event row locked until the surrounding
/// transaction ends.
///
/// ## Errors
/// Returns a database error if a query fails.
pub async fn find_locked(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Option<Event>> {
    let Some(record) = by_id_for_owner_locked(id, user_id)
        .get_result(conn)
        .await
        .optional()?
    else {
        return Ok(None);
    };
    Ok(with_recurrence(conn, vec![record]).await?.pop())
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert(conn: &mut AsyncPgConnection, new: &NewEvent<'_>) -> QueryResult<EventRecord> {
    diesel::insert_into(event::table)
        .values(new)
        .returning(EventRecord::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn update(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    changes: &EventChangeset<'_>,
) -> QueryResult<EventRecord> {
    diesel::update(event::table.filter(event::id.eq(id)))
        .set(changes)
        .returning(EventRecord::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Deletes an owned event and returns the ID of the rule it linked, or
/// `None` if no owned event has that ID. The caller removes the rule.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Option<Option<uuid::Uuid>>> {
    diesel::delete(
        event::table
            .filter(event::id.eq(id))
            .filter(event::user_id.eq(user_id)),
    )
    .returning(event::recurrence_id)
    .get_result(conn)
    .await
    .optional()
}

/// ## Summary
/// Deletes every event in a calendar and returns the rule IDs they linked.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_in_calendar(
    conn: &mut AsyncPgConnection,
    calendar_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Vec<uuid::Uuid>> {
    let linked: Vec<Option<uuid::Uuid>> = diesel::delete(
        event::table
            .filter(event::calendar_id.eq(calendar_id))
            .filter(event::user_id.eq(user_id)),
    )
    .returning(event::recurrence_id)
    .get_results(conn)
    .await?;

    Ok(linked.into_iter().flatten().collect())
}
