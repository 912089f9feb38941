pub mod service;

pub use service::{
    CalendarDetail, create_calendar, delete_calendar, get_calendar, list_calendars,
    update_calendar,
};
