//! Account lookups and inserts.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::app_user;
use crate::model::user::{NewUser, UserRecord};

/// ## Summary
/// Returns a query to find an account by its normalized email.
#[must_use]
pub fn by_email(email: &str) -> app_user::BoxedQuery<'_, diesel::pg::Pg> {
    app_user::table
        .filter(app_user::email.eq(email))
        .into_boxed()
}

/// ## Summary
/// Returns a query to find an account by ID.
#[must_use]
pub fn by_id(id: uuid::Uuid) -> app_user::BoxedQuery<'static, diesel::pg::Pg> {
    app_user::table.filter(app_user::id.eq(id)).into_boxed()
}

/// ## Summary
/// Loads the account registered under `email`, if any.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_email(
    conn: &mut AsyncPgConnection,
    email: &str,
) -> QueryResult<Option<UserRecord>> {
    by_email(email)
        .select(UserRecord::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts a new account.
///
/// ## Errors
/// Returns a unique violation if the email is already registered.
pub async fn insert(conn: &mut AsyncPgConnection, user: &NewUser<'_>) -> QueryResult<UserRecord> {
    diesel::insert_into(app_user::table)
        .values(user)
        .returning(UserRecord::as_returning())
        .get_result(conn)
        .await
}
