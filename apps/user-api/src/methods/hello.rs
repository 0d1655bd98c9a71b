use crate::methods::routes::USERS_HELLO_PATH;
use crate::middleware::AuthenticatedUser;

/// Greets the caller by their token's username.
#[utoipa::path(
    get,
    path = USERS_HELLO_PATH,
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller's username", body = String),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Moderator role required"),
    )
)]
pub async fn hello(user: AuthenticatedUser) -> String {
    user.username
}
