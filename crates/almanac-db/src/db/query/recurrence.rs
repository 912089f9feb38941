//! Recurrence rule statements. Rules have no owner column: they are reached
//! only through the event that links them.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::recurrence_rule;
use crate::model::recurrence::{NewRecurrenceRule, RecurrenceRuleChangeset, RecurrenceRuleRecord};

/// ## Summary
/// Returns a query for the rules with the given IDs.
#[must_use]
pub fn by_ids(ids: &[uuid::Uuid]) -> recurrence_rule::BoxedQuery<'_, diesel::pg::Pg> {
    recurrence_rule::table
        .filter(recurrence_rule::id.eq_any(ids))
        .into_boxed()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn load_many(
    conn: &mut AsyncPgConnection,
    ids: &[uuid::Uuid],
) -> QueryResult<Vec<RecurrenceRuleRecord>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    by_ids(ids)
        .select(RecurrenceRuleRecord::as_select())
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the insert fails or violates a CHECK constraint.
pub async fn insert(
    conn: &mut AsyncPgConnection,
    rule: &NewRecurrenceRule<'_>,
) -> QueryResult<usize> {
    diesel::insert_into(recurrence_rule::table)
        .values(rule)
        .execute(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn update(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    changes: &RecurrenceRuleChangeset<'_>,
) -> QueryResult<usize> {
    diesel::update(recurrence_rule::table.filter(recurrence_rule::id.eq(id)))
        .set(changes)
        .execute(conn)
        .await
}

/// ## Summary
/// Deletes the listed rules. Missing IDs are ignored.
///
/// ## Errors
/// Returns a database error if the delete fails, including when an event still
/// references one of the rules.
pub async fn delete_many(conn: &mut AsyncPgConnection, ids: &[uuid::Uuid]) -> QueryResult<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    diesel::delete(recurrence_rule::table.filter(recurrence_rule::id.eq_any(ids)))
        .execute(conn)
        .await
}
