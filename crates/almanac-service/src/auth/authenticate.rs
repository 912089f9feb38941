//! Resolves the caller of a request.
//!
//! Credentials are tried in order: `Authorization: Bearer <token>`, the session
//! cookie, then `Authorization: Basic <base64(email:password)>`. Unknown or
//! expired credentials resolve to no user rather than an error.

use almanac_core::constants::SESSION_COOKIE;
use almanac_core::model::User;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use salvo::http::header::AUTHORIZATION;

use super::service::check_credentials;
use super::session::hash_token;
use crate::error::{ServiceError, ServiceResult};
use crate::store::{AccountStore, Store};

/// Credentials presented with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Basic { email: String, password: String },
}

/// ## Summary
/// Extracts credentials from the request headers and cookies.
#[must_use]
pub fn credentials(req: &salvo::Request) -> Option<Credentials> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    if let Some(token) = authorization.and_then(|h| strip_scheme(h, "Bearer"))
        && !token.is_empty()
    {
        return Some(Credentials::Token(token.to_string()));
    }

    if let Some(cookie) = req.cookie(SESSION_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(Credentials::Token(cookie.value().to_string()));
    }

    authorization
        .and_then(|h| strip_scheme(h, "Basic"))
        .and_then(decode_basic)
}

fn strip_scheme<'a>(header: &'a str, scheme: &str) -> Option<&'a str> {
    let (given, rest) = header.split_once(' ')?;
    given.eq_ignore_ascii_case(scheme).then_some(rest.trim())
}

fn decode_basic(encoded: &str) -> Option<Credentials> {
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some(Credentials::Basic {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// ## Summary
/// Authenticates a request. Returns the user and, for token credentials, the
/// token used.
///
/// ## Errors
/// Returns an error only if the store fails.
#[tracing::instrument(skip_all)]
pub async fn authenticate(
    req: &salvo::Request,
    store: &dyn Store,
) -> ServiceResult<Option<(User, Option<String>)>> {
    match credentials(req) {
        None => Ok(None),
        Some(Credentials::Token(token)) => {
            let user = store.session_user(&hash_token(&token), Utc::now()).await?;
            if user.is_none() {
                tracing::debug!("Session token unknown or expired");
            }
            Ok(user.map(|u| (u, Some(token))))
        }
        Some(Credentials::Basic { email, password }) => {
            match check_credentials(store, &email, &password).await {
                Ok(user) => Ok(Some((user, None))),
                Err(ServiceError::NotAuthenticated) => {
                    tracing::debug!("Basic credentials rejected");
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        }
    }
}
