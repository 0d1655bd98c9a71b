use serde::{Deserialize, Serialize};
use user_lib::entities::{UserCreationRequest, UserProfile};
use utoipa::ToSchema;

/// Registration payload. Absent fields arrive as empty strings so that they
/// are reported by validation rather than rejected by the JSON extractor.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl std::fmt::Debug for UserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

impl From<UserRequest> for UserCreationRequest {
    fn from(req: UserRequest) -> Self {
        UserCreationRequest::new(
            req.username,
            req.email,
            req.password,
            req.first_name,
            req.last_name,
        )
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub groups: Vec<String>,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        UserResponse {
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            roles: profile.roles,
            groups: profile.groups,
        }
    }
}
