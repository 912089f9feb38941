use almanac_core::constants::{AUTH_ROUTE_COMPONENT, SESSION_COOKIE};
use almanac_core::model::User;
use almanac_service::auth::depot::get_session_token_from_depot;
use almanac_service::auth::{self, AuthOutcome, Registration, get_user_from_depot};
use almanac_service::error::ServiceError;
use salvo::http::StatusCode;
use salvo::http::cookie::{Cookie, SameSite};
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extract::{Caller, json_body};
use crate::config::get_config_from_depot;
use crate::error::AppResult;
use crate::store_handler::get_store_from_depot;

const INVALID_LOGIN: &str = "Invalid login credentials. Please try again or contact support.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

/// Body returned by login and registration.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub data: User,
}

fn start_session(res: &mut Response, outcome: AuthOutcome, secure: bool) {
    let cookie = Cookie::build((SESSION_COOKIE, outcome.session.token.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    res.add_cookie(cookie);

    res.render(Json(SessionResponse {
        session: outcome.session.token,
        user: SessionUser {
            id: outcome.user.id,
            email: outcome.user.email,
        },
    }));
}

/// ## Summary
/// POST /auth/register - creates an account and signs it in.
///
/// ## Errors
/// - 400 for an invalid form or an email that is already registered
/// - 403 if registration is disabled
#[handler]
#[tracing::instrument(skip_all)]
async fn register(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let body: RegisterRequest = json_body(req).await?;
    let config = get_config_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;

    let outcome = auth::register(
        store.as_ref(),
        &config.auth,
        Registration {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password: body.password,
            phone_number: body.phone_number,
        },
    )
    .await?;

    start_session(res, outcome, config.auth.secure_cookie);
    Ok(())
}

/// ## Summary
/// POST /auth/login - checks the password and issues a session, returned in
/// the body and as a cookie.
///
/// ## Errors
/// Returns 401 for an unknown email or a wrong password.
#[handler]
#[tracing::instrument(skip_all)]
async fn login(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let body: LoginRequest = json_body(req).await?;
    let config = get_config_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;

    match auth::login(store.as_ref(), &config.auth, &body.email, &body.password).await {
        Ok(outcome) => {
            start_session(res, outcome, config.auth.secure_cookie);
            Ok(())
        }
        Err(ServiceError::NotAuthenticated) => {
            res.status_code(StatusCode::UNAUTHORIZED);
            res.render(Json(serde_json::json!({ "detail": INVALID_LOGIN })));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// ## Summary
/// GET /auth/logout - drops the session the request authenticated with.
#[handler]
#[tracing::instrument(skip_all)]
async fn logout(depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let caller = Caller::from_depot(depot)?;
    if let Some(token) = get_session_token_from_depot(depot) {
        auth::logout(caller.store.as_ref(), token).await?;
    }
    tracing::info!(user_id = %caller.user.id, "User logged out");

    res.remove_cookie(SESSION_COOKIE);
    res.render(Json(serde_json::json!({
        "message": "The user has been logged out successfully."
    })));
    Ok(())
}

/// ## Summary
/// GET /auth/me - the authenticated user.
#[handler]
async fn me(depot: &mut Depot, res: &mut Response) -> AppResult<()> {
    let user = get_user_from_depot(depot)?.clone();
    res.render(Json(MeResponse { data: user }));
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(AUTH_ROUTE_COMPONENT)
        .push(Router::with_path("register").post(register))
        .push(Router::with_path("login").post(login))
        .push(Router::with_path("logout").get(logout))
        .push(Router::with_path("me").get(me))
}
