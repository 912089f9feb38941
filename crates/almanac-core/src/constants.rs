/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const AUTH_ROUTE_COMPONENT: &str = "auth";
pub const AUTH_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", AUTH_ROUTE_COMPONENT);

pub const EVENTS_ROUTE_COMPONENT: &str = "events";
pub const EVENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", EVENTS_ROUTE_COMPONENT);

pub const CALENDARS_ROUTE_COMPONENT: &str = "calendars";
pub const CALENDARS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", CALENDARS_ROUTE_COMPONENT);

/// Cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "almanac_session";

/// Product identifier written into exported iCalendar documents.
pub const ICAL_PRODID: &str = "-//Almanac//Almanac Calendar//EN";

/// Domain suffix for exported event UIDs.
pub const ICAL_UID_DOMAIN: &str = "almanac";
