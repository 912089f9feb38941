//! Database enum types with Diesel serialization.
//!
//! Each enum maps a `TEXT` column guarded by a CHECK constraint and implements
//! `ToSql` and `FromSql` for conversion between Rust and `PostgreSQL`.

use almanac_core::model::{Frequency, MonthlyType};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::io::Write;

/// Maps to `recurrence_rule.frequency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum DbFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl DbFrequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

impl ToSql<Text, Pg> for DbFrequency {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for DbFrequency {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"DAILY" => Ok(Self::Daily),
            b"WEEKLY" => Ok(Self::Weekly),
            b"MONTHLY" => Ok(Self::Monthly),
            b"YEARLY" => Ok(Self::Yearly),
            _ => Err("Unrecognized frequency".into()),
        }
    }
}

impl From<Frequency> for DbFrequency {
    fn from(value: Frequency) -> Self {
        match value {
            Frequency::Daily => Self::Daily,
            Frequency::Weekly => Self::Weekly,
            Frequency::Monthly => Self::Monthly,
            Frequency::Yearly => Self::Yearly,
        }
    }
}

impl From<DbFrequency> for Frequency {
    fn from(value: DbFrequency) -> Self {
        match value {
            DbFrequency::Daily => Self::Daily,
            DbFrequency::Weekly => Self::Weekly,
            DbFrequency::Monthly => Self::Monthly,
            DbFrequency::Yearly => Self::Yearly,
        }
    }
}

/// Maps to `recurrence_rule.monthly_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum DbMonthlyType {
    Weekday,
    Date,
}

impl DbMonthlyType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekday => "WEEKDAY",
            Self::Date => "DATE",
        }
    }
}

impl ToSql<Text, Pg> for DbMonthlyType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for DbMonthlyType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"WEEKDAY" => Ok(Self::Weekday),
            b"DATE" => Ok(Self::Date),
            _ => Err("Unrecognized monthly type".into()),
        }
    }
}

impl From<MonthlyType> for DbMonthlyType {
    fn from(value: MonthlyType) -> Self {
        match value {
            MonthlyType::Weekday => Self::Weekday,
            MonthlyType::Date => Self::Date,
        }
    }
}

impl From<DbMonthlyType> for MonthlyType {
    fn from(value: DbMonthlyType) -> Self {
        match value {
            DbMonthlyType::Weekday => Self::Weekday,
            DbMonthlyType::Date => Self::Date,
        }
    }
}
