use salvo::Depot;
use salvo::http::StatusCode;
use tracing::error;

use crate::store_handler::get_store_from_depot;
use almanac_service::auth::{DepotUser, authenticate, depot::depot_keys};

/// ## Summary
/// Resolves the caller of every request and stores it in the depot.
///
/// Requests without valid credentials continue as `DepotUser::Public`;
/// handlers that need a user reject them.
///
/// ## Side Effects
/// Inserts the caller under `depot_keys::AUTHENTICATED_USER` and, for token
/// credentials, the token under `depot_keys::SESSION_TOKEN`.
///
/// ## Errors
/// Answers 500 if the store is missing or fails.
#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        if req.method() == salvo::http::Method::OPTIONS {
            depot.insert(depot_keys::AUTHENTICATED_USER, DepotUser::Public);
            return;
        }

        let store = match get_store_from_depot(depot) {
            Ok(store) => store,
            Err(e) => {
                error!(error = ?e, "Failed to get store from depot");
                res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        match authenticate(req, store.as_ref()).await {
            Ok(Some((user, token))) => {
                tracing::debug!(user_id = %user.id, "User authenticated");
                depot.insert(depot_keys::AUTHENTICATED_USER, DepotUser::User(user));
                if let Some(token) = token {
                    depot.insert(depot_keys::SESSION_TOKEN, token);
                }
            }
            Ok(None) => {
                tracing::debug!("Request not authenticated, treating as public");
                depot.insert(depot_keys::AUTHENTICATED_USER, DepotUser::Public);
            }
            Err(e) => {
                error!(error = ?e, "Authentication failed with error");
                res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
                res.body("Internal Server Error");
                ctrl.skip_rest();
            }
        }
    }
}

/// Middleware that authenticates requests. Attach it with `hoop`.
pub struct AuthMiddleware;
