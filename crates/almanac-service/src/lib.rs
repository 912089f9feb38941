//! Almanac service layer: event lifecycle, calendars, accounts and export.
//!
//! ## Module Organization
//!
//! - `auth`: passwords, session tokens and request authentication
//! - `calendar`: owner-scoped calendar operations
//! - `event`: event lifecycle and recurrence planning
//! - `ical`: iCalendar serialization of stored events
//! - `store`: storage traits with `PostgreSQL` and in-memory implementations

pub mod auth;
pub mod calendar;
pub mod error;
pub mod event;
pub mod ical;
pub mod store;
