pub mod calendar;
pub mod event;
pub mod recurrence;
pub mod session;
pub mod user;
