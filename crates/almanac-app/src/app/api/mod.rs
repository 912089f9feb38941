mod app_specific;
mod auth;
mod calendars;
mod events;
mod export;
mod extract;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

pub use almanac_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, AUTH_ROUTE_COMPONENT, AUTH_ROUTE_PREFIX,
    CALENDARS_ROUTE_COMPONENT, CALENDARS_ROUTE_PREFIX, EVENTS_ROUTE_COMPONENT,
    EVENTS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the API router. Every route runs behind the auth middleware;
/// handlers that need a user answer 401 themselves.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .hoop(AuthMiddleware)
        .push(app_specific::routes())
        .push(auth::routes())
        .push(events::routes())
        .push(calendars::routes())
}
