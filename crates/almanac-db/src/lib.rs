//! Almanac persistence: PostgreSQL schema, row models and query builders.

pub mod db;
pub mod error;
pub mod model;
