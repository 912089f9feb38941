pub mod calendar;
pub mod event;
pub mod recurrence;
pub mod user;

pub use calendar::{Calendar, CalendarFields};
pub use event::{Event, EventFields};
pub use recurrence::{
    Frequency, MonthlyType, RecurrenceBundle, RecurrenceInput, RecurrencePattern, RecurrenceRule,
    recurrence_bundle_is_present,
};
pub use user::User;
