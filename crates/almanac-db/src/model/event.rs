use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// Event row. `recurrence_id` is the only link to the owned rule.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::event)]
#[diesel(check_for_backend(Pg))]
pub struct EventRecord {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub calendar_id: uuid::Uuid,
    pub recurrence_id: Option<uuid::Uuid>,
    pub title: String,
    pub description: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub color: Option<String>,
    pub is_all_day: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::event)]
pub struct NewEvent<'a> {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub calendar_id: uuid::Uuid,
    pub recurrence_id: Option<uuid::Uuid>,
    pub title: &'a str,
    pub description: &'a str,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub color: Option<&'a str>,
    pub is_all_day: bool,
}

/// Full overwrite of an event row; `None` clears nullable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::event)]
#[diesel(treat_none_as_null = true)]
pub struct EventChangeset<'a> {
    pub calendar_id: uuid::Uuid,
    pub recurrence_id: Option<uuid::Uuid>,
    pub title: &'a str,
    pub description: &'a str,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub color: Option<&'a str>,
    pub is_all_day: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
