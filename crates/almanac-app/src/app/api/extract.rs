//! Request extraction shared by the JSON handlers.

use almanac_core::model::User;
use almanac_service::auth::get_user_from_depot;
use almanac_service::store::SharedStore;
use salvo::{Depot, Request};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store_handler::get_store_from_depot;

/// The authenticated caller and the store, resolved together by every
/// protected handler.
pub struct Caller {
    pub user: User,
    pub store: SharedStore,
}

impl Caller {
    /// ## Errors
    /// Returns `NotAuthenticated` for public requests and an invariant
    /// violation if no store was injected.
    pub fn from_depot(depot: &Depot) -> AppResult<Self> {
        let user = get_user_from_depot(depot)?.clone();
        let store = get_store_from_depot(depot)?;
        Ok(Self { user, store })
    }
}

/// ## Summary
/// Parses the JSON request body.
///
/// ## Errors
/// Returns `BadRequest` if the body is missing or does not match `T`.
pub async fn json_body<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        AppError::BadRequest(e.to_string())
    })
}

/// ## Summary
/// Reads the `{id}` path parameter.
///
/// ## Errors
/// Returns `NotFound` with `detail` if the segment is not a UUID.
pub fn path_id(req: &Request, detail: &str) -> AppResult<Uuid> {
    req.param::<String>("id")
        .and_then(|raw| Uuid::parse_str(&raw).ok())
        .ok_or_else(|| AppError::NotFound(detail.to_string()))
}
