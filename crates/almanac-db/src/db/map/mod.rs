//! Conversions between row models and domain types.

pub mod calendar;
pub mod event;
pub mod recurrence;
pub mod user;
