//! Event lifecycle: create, update and delete an event together with its
//! recurrence rule.

pub mod lifecycle;
pub mod recurrence;


pub use lifecycle::{
    EventInput, EventListing, create_event, delete_event, get_event, list_events,
    list_events_with_calendars, update_event,
};
pub use recurrence::RecurrenceChange;
