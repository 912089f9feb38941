use almanac_core::validation::ValidationErrors;
use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] almanac_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Conflict on {field}: {message}")]
    Conflict {
        field: &'static str,
        message: String,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("Diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),
}

impl ServiceError {
    pub(crate) fn event_not_found() -> Self {
        Self::NotFound("Event not found.".to_string())
    }

    pub(crate) fn calendar_not_found() -> Self {
        Self::NotFound("Calendar not found.".to_string())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
