use almanac_service::error::ServiceError;
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Writer};
use serde_json::json;
use thiserror::Error;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] almanac_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
const INTERNAL: &str = "An unexpected error occurred.";

impl AppError {
    /// ## Summary
    /// Writes the status code and JSON body for this error.
    ///
    /// Internal failures are logged here and answered with a generic body.
    pub fn render(self, res: &mut Response) {
        let (status, body) = match self {
            Self::ServiceError(ServiceError::ValidationError(errors)) => (
                StatusCode::BAD_REQUEST,
                json!({ "detail": "Invalid input.", "errors": errors.by_field() }),
            ),
            Self::ServiceError(ServiceError::Conflict { field, message }) => (
                StatusCode::BAD_REQUEST,
                json!({ "detail": message, "errors": { field: [message] } }),
            ),
            Self::ServiceError(ServiceError::NotFound(detail)) | Self::NotFound(detail) => {
                (StatusCode::NOT_FOUND, json!({ "detail": detail }))
            }
            Self::ServiceError(ServiceError::NotAuthenticated) => (
                StatusCode::UNAUTHORIZED,
                json!({ "detail": NOT_AUTHENTICATED }),
            ),
            Self::ServiceError(ServiceError::Forbidden(detail)) => {
                (StatusCode::FORBIDDEN, json!({ "detail": detail }))
            }
            Self::BadRequest(detail) => (StatusCode::BAD_REQUEST, json!({ "detail": detail })),
            other => {
                tracing::error!(error = ?other, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": INTERNAL }),
                )
            }
        };

        res.status_code(status);
        res.render(Json(body));
    }
}

#[salvo::async_trait]
impl Writer for AppError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        self.render(res);
    }
}
