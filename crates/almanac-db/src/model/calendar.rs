use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::calendar)]
#[diesel(check_for_backend(Pg))]
pub struct CalendarRecord {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub name: String,
    pub description: String,
    pub color: String,
    pub is_visible: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::calendar)]
pub struct NewCalendar<'a> {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub color: &'a str,
    pub is_visible: bool,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::calendar)]
pub struct CalendarChangeset<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub color: &'a str,
    pub is_visible: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
