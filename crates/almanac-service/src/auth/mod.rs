//! Authentication flow.
//!
//! ## Module Organization
//!
//! - `authenticate`: resolves the caller of a request (bearer, cookie, basic)
//! - `depot`: stores and reads the resolved caller in the Salvo depot
//! - `password`: password hashing and verification with Argon2
//! - `service`: registration, login and logout
//! - `session`: session token generation and hashing

pub mod authenticate;
pub mod depot;
pub mod password;
pub mod service;
pub mod session;

pub use authenticate::authenticate;
pub use depot::{DepotUser, get_user_from_depot, is_authenticated};
pub use service::{AuthOutcome, Registration, login, logout, register};
pub use session::IssuedSession;
