//! Almanac HTTP application: routing, middleware and JSON handlers.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod store_handler;
