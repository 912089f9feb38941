//! End-to-end tests of the HTTP API over an in-memory store.

mod auth;
mod calendars;
mod events;
mod helpers;
