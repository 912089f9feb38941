//! Event endpoints under `/api/events`.

mod types;

use almanac_core::constants::EVENTS_ROUTE_COMPONENT;
use almanac_service::error::ServiceError;
use almanac_service::{event, ical};
use chrono::Utc;
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};

use super::export::write_calendar;
use super::extract::{Caller, json_body, path_id};
use crate::error::AppResult;
use types::{EventListItem, EventRequest, EventResponse};

const NOT_FOUND: &str = "Event not found.";

/// ## Summary
/// GET /events - the caller's events, newest start first, each with its owner
/// and calendar.
#[handler]
#[tracing::instrument(skip_all)]
async fn list(depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let listings =
        event::list_events_with_calendars(caller.store.as_ref(), caller.user.id).await?;

    let items: Vec<EventListItem> = listings
        .into_iter()
        .map(|listing| EventListItem::new(listing, &caller.user))
        .collect();
    res.render(Json(items));
    Ok(())
}

/// ## Summary
/// POST /events/create - creates an event and, if recurrence fields are
/// present, its rule.
///
/// ## Errors
/// - 400 for invalid fields or recurrence values
/// - 404 if the calendar is missing or foreign
#[handler]
#[tracing::instrument(skip_all)]
async fn create(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let body: EventRequest = json_body(req).await?;
    let input = body.into_input().map_err(ServiceError::from)?;

    let created = event::create_event(caller.store.as_ref(), caller.user.id, input).await?;

    res.status_code(StatusCode::CREATED);
    res.render(Json(EventResponse::from(created)));
    Ok(())
}

#[handler]
#[tracing::instrument(skip_all)]
async fn detail(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let id = path_id(req, NOT_FOUND)?;

    let found = event::get_event(caller.store.as_ref(), caller.user.id, id).await?;
    res.render(Json(EventResponse::from(found)));
    Ok(())
}

/// ## Summary
/// PUT /events/{id}/update - overwrites the event and attaches, merges into
/// or detaches its rule.
///
/// ## Errors
/// - 404 if the event or the target calendar is missing or foreign
/// - 400 for invalid fields or an invalid merged rule
#[handler]
#[tracing::instrument(skip_all)]
async fn update(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let id = path_id(req, NOT_FOUND)?;
    let body: EventRequest = json_body(req).await?;
    let input = body.into_input().map_err(ServiceError::from)?;

    let updated = event::update_event(caller.store.as_ref(), caller.user.id, id, input).await?;
    res.render(Json(EventResponse::from(updated)));
    Ok(())
}

/// ## Summary
/// DELETE /events/{id}/delete - removes the event and its rule. Answers 200
/// with an empty body.
#[handler]
#[tracing::instrument(skip_all)]
async fn delete(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let id = path_id(req, NOT_FOUND)?;

    event::delete_event(caller.store.as_ref(), caller.user.id, id).await?;
    res.status_code(StatusCode::OK);
    Ok(())
}

/// ## Summary
/// GET /events/export - every event of the caller as one iCalendar file.
#[handler]
#[tracing::instrument(skip_all)]
async fn export(depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let events = event::list_events(caller.store.as_ref(), caller.user.id).await?;

    let document = ical::export_events(&events, None, Utc::now());
    write_calendar(res, document, "almanac.ics");
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .get(list)
        .push(Router::with_path("create").post(create))
        .push(Router::with_path("export").get(export))
        .push(
            Router::with_path("{id}")
                .get(detail)
                .push(Router::with_path("update").put(update))
                .push(Router::with_path("delete").delete(delete)),
        )
}
