use std::collections::BTreeMap;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use user_lib::errors_service::{
    map_error, ServiceError, UserServiceError, INTERNAL_ERROR_MESSAGE, STATUS_BAD_REQUEST,
    STATUS_NOT_FOUND,
};
use user_lib::validation::FieldViolation;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Rendered as a JSON object of field name to message
    Validation(Vec<FieldViolation>),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Internal,
}

impl ApiError {
    pub fn invalid_uuid() -> Self {
        ApiError::BadRequest("invalid uuid".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(violations) => {
                let body: BTreeMap<String, String> = violations
                    .into_iter()
                    .map(|v| (v.field, v.message))
                    .collect();
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                msg,
            )
                .into_response(),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
            ApiError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err.status {
            STATUS_NOT_FOUND => ApiError::NotFound(err.message),
            STATUS_BAD_REQUEST => ApiError::BadRequest(err.message),
            _ => ApiError::Internal,
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Validation(violations) => ApiError::Validation(violations),
            other => ApiError::from(map_error(&other)),
        }
    }
}

/// Converts a service error to an ApiError, logging anything that maps to a
/// server error. The cause never reaches the response body.
pub fn handle_service_error(err: UserServiceError, env: &str, operation: &str) -> ApiError {
    if map_error(&err).is_server_error() {
        tracing::error!(env = %env, error = ?err, operation = %operation, "service error");
    } else {
        tracing::debug!(error = %err, operation = %operation, "request rejected");
    }
    ApiError::from(err)
}
