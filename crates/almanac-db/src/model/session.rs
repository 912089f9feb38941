use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::user_session)]
#[diesel(check_for_backend(Pg))]
pub struct SessionRecord {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub token_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::user_session)]
pub struct NewSession<'a> {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub token_hash: &'a str,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}
