use crate::provider::errors::IdentityProviderError;
use crate::validation::FieldViolation;

pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";
pub const VALIDATION_FAILED_MESSAGE: &str = "validation failed";

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UserServiceError {
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldViolation>),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<IdentityProviderError> for UserServiceError {
    fn from(err: IdentityProviderError) -> Self {
        match err {
            IdentityProviderError::NotFound(msg) => UserServiceError::NotFound(msg),
            other => UserServiceError::Internal(other.into()),
        }
    }
}

/// Failure rendered to the caller: a message plus an HTTP status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub message: String,
    pub status: u16,
}

impl ServiceError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= STATUS_INTERNAL_SERVER_ERROR
    }
}

/// Maps a service failure onto the status taxonomy.
///
/// Absent resources keep their message verbatim. Anything unclassified becomes
/// an opaque 500 so provider details never reach the caller.
pub fn map_error(err: &UserServiceError) -> ServiceError {
    match err {
        UserServiceError::Validation(_) => {
            ServiceError::new(VALIDATION_FAILED_MESSAGE, STATUS_BAD_REQUEST)
        }
        UserServiceError::NotFound(msg) => ServiceError::new(msg.clone(), STATUS_NOT_FOUND),
        UserServiceError::Internal(_) => {
            ServiceError::new(INTERNAL_ERROR_MESSAGE, STATUS_INTERNAL_SERVER_ERROR)
        }
    }
}
