use diesel::{pg::Pg, prelude::*};

use crate::db::{
    enums::{DbFrequency, DbMonthlyType},
    schema,
};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::recurrence_rule)]
#[diesel(check_for_backend(Pg))]
pub struct RecurrenceRuleRecord {
    pub id: uuid::Uuid,
    pub frequency: DbFrequency,
    pub monthly_type: Option<DbMonthlyType>,
    pub interval: i32,
    pub weekdays: Option<Vec<i32>>,
    pub weekday_ordinal: Option<i32>,
    pub end_date: Option<chrono::NaiveDate>,
    pub repeat_count: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::recurrence_rule)]
pub struct NewRecurrenceRule<'a> {
    pub id: uuid::Uuid,
    pub frequency: DbFrequency,
    pub monthly_type: Option<DbMonthlyType>,
    pub interval: i32,
    pub weekdays: Option<&'a [i32]>,
    pub weekday_ordinal: Option<i32>,
    pub end_date: Option<chrono::NaiveDate>,
    pub repeat_count: Option<i32>,
}

/// Writes a merged definition back; every column is overwritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::recurrence_rule)]
#[diesel(treat_none_as_null = true)]
pub struct RecurrenceRuleChangeset<'a> {
    pub frequency: DbFrequency,
    pub monthly_type: Option<DbMonthlyType>,
    pub interval: i32,
    pub weekdays: Option<&'a [i32]>,
    pub weekday_ordinal: Option<i32>,
    pub end_date: Option<chrono::NaiveDate>,
    pub repeat_count: Option<i32>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
