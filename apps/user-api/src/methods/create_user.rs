use axum::{extract::State, http::StatusCode, Json};
use user_lib::entities::UserCreationRequest;

use crate::error::{handle_service_error, ApiError};
use crate::methods::entities::UserRequest;
use crate::methods::routes::USERS_PATH;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = USERS_PATH,
    tag = "users",
    request_body = UserRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User created"),
        (status = 400, description = "Validation error: JSON object of field name to message"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Moderator role required"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserRequest>,
) -> Result<StatusCode, ApiError> {
    let request = UserCreationRequest::from(payload);

    state
        .user_service
        .create_user(&request)
        .await
        .map(|_user_id| StatusCode::OK)
        .map_err(|e| handle_service_error(e, &state.env, "create_user"))
}
