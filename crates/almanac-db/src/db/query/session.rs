//! Session token rows. Only token hashes are ever stored or queried.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::{app_user, user_session};
use crate::model::session::NewSession;
use crate::model::user::UserRecord;

/// ## Summary
/// Returns a query for the unexpired session matching `token_hash`.
#[must_use]
pub fn active(
    token_hash: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> user_session::BoxedQuery<'_, diesel::pg::Pg> {
    user_session::table
        .filter(user_session::token_hash.eq(token_hash))
        .filter(user_session::expires_at.gt(now))
        .into_boxed()
}

/// ## Summary
/// Inserts a new session.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert(conn: &mut AsyncPgConnection, session: &NewSession<'_>) -> QueryResult<usize> {
    diesel::insert_into(user_session::table)
        .values(session)
        .execute(conn)
        .await
}

/// ## Summary
/// Resolves the owner of an unexpired session.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn user_for_token(
    conn: &mut AsyncPgConnection,
    token_hash: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> QueryResult<Option<UserRecord>> {
    active(token_hash, now)
        .inner_join(app_user::table.on(app_user::id.eq(user_session::user_id)))
        .select(UserRecord::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes the session matching `token_hash`. Absent sessions are not an error.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_by_token(conn: &mut AsyncPgConnection, token_hash: &str) -> QueryResult<usize> {
    diesel::delete(user_session::table.filter(user_session::token_hash.eq(token_hash)))
        .execute(conn)
        .await
}

/// ## Summary
/// Removes a user's expired sessions.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_expired_for_user(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    now: chrono::DateTime<chrono::Utc>,
) -> QueryResult<usize> {
    diesel::delete(
        user_session::table
            .filter(user_session::user_id.eq(user_id))
            .filter(user_session::expires_at.le(now)),
    )
    .execute(conn)
    .await
}
