//! Calendar endpoints under `/api/calendars`.

mod types;

use almanac_core::constants::CALENDARS_ROUTE_COMPONENT;
use almanac_service::{calendar, ical};
use chrono::Utc;
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};

use super::export::{calendar_filename, write_calendar};
use super::extract::{Caller, json_body, path_id};
use crate::error::AppResult;
use types::{CalendarRequest, CalendarResponse};

const NOT_FOUND: &str = "Calendar not found.";

#[handler]
#[tracing::instrument(skip_all)]
async fn list(depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let calendars: Vec<CalendarResponse> =
        calendar::list_calendars(caller.store.as_ref(), caller.user.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    res.render(Json(calendars));
    Ok(())
}

#[handler]
#[tracing::instrument(skip_all)]
async fn create(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let body: CalendarRequest = json_body(req).await?;

    let created =
        calendar::create_calendar(caller.store.as_ref(), caller.user.id, body.into()).await?;
    res.status_code(StatusCode::CREATED);
    res.render(Json(CalendarResponse::from(created)));
    Ok(())
}

#[handler]
#[tracing::instrument(skip_all)]
async fn detail(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let id = path_id(req, NOT_FOUND)?;

    let found = calendar::get_calendar(caller.store.as_ref(), caller.user.id, id).await?;
    res.render(Json(CalendarResponse::from(found)));
    Ok(())
}

/// ## Summary
/// PUT /calendars/{id}/update - overwrites the calendar fields. The response
/// does not include the events.
#[handler]
#[tracing::instrument(skip_all)]
async fn update(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let id = path_id(req, NOT_FOUND)?;
    let body: CalendarRequest = json_body(req).await?;

    let updated =
        calendar::update_calendar(caller.store.as_ref(), caller.user.id, id, body.into()).await?;
    res.render(Json(CalendarResponse::from(updated)));
    Ok(())
}

/// ## Summary
/// DELETE /calendars/{id}/delete - removes the calendar with its events and
/// their rules. Answers 204 even if nothing was there.
#[handler]
#[tracing::instrument(skip_all)]
async fn delete(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let id = path_id(req, NOT_FOUND)?;

    calendar::delete_calendar(caller.store.as_ref(), caller.user.id, id).await?;
    res.status_code(StatusCode::NO_CONTENT);
    Ok(())
}

#[handler]
#[tracing::instrument(skip_all)]
async fn export(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    let id = path_id(req, NOT_FOUND)?;

    let found = calendar::get_calendar(caller.store.as_ref(), caller.user.id, id).await?;
    let name = found.calendar.name.as_str();
    let document = ical::export_events(&found.events, Some(name), Utc::now());
    write_calendar(res, document, &calendar_filename(name));
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(CALENDARS_ROUTE_COMPONENT)
        .get(list)
        .push(Router::with_path("create").post(create))
        .push(
            Router::with_path("{id}")
                .get(detail)
                .push(Router::with_path("update").put(update))
                .push(Router::with_path("delete").delete(delete))
                .push(Router::with_path("export").get(export)),
        )
}
