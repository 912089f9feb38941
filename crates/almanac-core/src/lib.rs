//! Almanac core: configuration, domain model and validation shared by every crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod validation;
