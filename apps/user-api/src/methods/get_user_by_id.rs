use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{handle_service_error, ApiError};
use crate::methods::entities::UserResponse;
use crate::methods::routes::USERS_BY_ID_PATH;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = USERS_BY_ID_PATH,
    tag = "users",
    security(("bearer" = [])),
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Invalid UUID"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Moderator role required"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_user_by_id(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = Uuid::parse_str(&id).map_err(|_| ApiError::invalid_uuid())?;

    state
        .user_service
        .get_user_by_id(user_id)
        .await
        .map(|profile| Json(UserResponse::from(profile)))
        .map_err(|e| handle_service_error(e, &state.env, "get_user_by_id"))
}
