//! Calendar statements. Every lookup is scoped by owner.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::calendar;
use crate::model::calendar::{CalendarChangeset, CalendarRecord, NewCalendar};

/// ## Summary
/// Returns a query for all calendars owned by `user_id`, oldest first.
#[must_use]
pub fn owned_by(user_id: uuid::Uuid) -> calendar::BoxedQuery<'static, diesel::pg::Pg> {
    calendar::table
        .filter(calendar::user_id.eq(user_id))
        .order((calendar::created_at.asc(), calendar::id.asc()))
        .into_boxed()
}

/// ## Summary
/// Returns a query for one calendar, visible only to its owner.
#[must_use]
pub fn by_id_for_owner(
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> calendar::BoxedQuery<'static, diesel::pg::Pg> {
    calendar::table
        .filter(calendar::id.eq(id))
        .filter(calendar::user_id.eq(user_id))
        .into_boxed()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn list(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
) -> QueryResult<Vec<CalendarRecord>> {
    owned_by(user_id)
        .select(CalendarRecord::as_select())
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Option<CalendarRecord>> {
    by_id_for_owner(id, user_id)
        .select(CalendarRecord::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert(
    conn: &mut AsyncPgConnection,
    new: &NewCalendar<'_>,
) -> QueryResult<CalendarRecord> {
    diesel::insert_into(calendar::table)
        .values(new)
        .returning(CalendarRecord::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Overwrites an owned calendar and returns the new row, or `None` if no owned
/// calendar has that ID.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    changes: &CalendarChangeset<'_>,
) -> QueryResult<Option<CalendarRecord>> {
    diesel::update(
        calendar::table
            .filter(calendar::id.eq(id))
            .filter(calendar::user_id.eq(user_id)),
    )
    .set(changes)
    .returning(CalendarRecord::as_returning())
    .get_result(conn)
    .await
    .optional()
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<usize> {
    diesel::delete(
        calendar::table
            .filter(calendar::id.eq(id))
            .filter(calendar::user_id.eq(user_id)),
    )
    .execute(conn)
    .await
}
