#![allow(clippy::expect_used)]
//! `PgStore` tests against a real `PostgreSQL` database.
//!
//! Run with `DATABASE_URL` set; without it every test returns early.

mod helpers;
mod store;
