//! iCalendar (RFC 5545) export of stored events.
//!
//! - `escape`: TEXT value escaping
//! - `fold`: content line folding at 75 octets
//! - `export`: VCALENDAR documents with one VEVENT per event

mod escape;
mod export;
mod fold;

pub use escape::escape_text;
pub use export::{CONTENT_TYPE, export_events, rrule_value};
pub use fold::fold_line;
