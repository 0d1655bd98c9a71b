use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payload accepted when registering a new user with the identity provider.
///
/// Field rules are declared here and evaluated by [`crate::validation::validate`].
#[derive(Clone, Default, PartialEq, Eq, Validate)]
pub struct UserCreationRequest {
    #[validate(length(
        min = 2,
        max = 30,
        message = "Username should be between 2 and 30 characters long"
    ))]
    pub username: String,
    #[validate(email(message = "Email should be valid"))]
    pub email: String,
    #[validate(length(min = 5, message = "Password should be greater than 4 characters long"))]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserCreationRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl std::fmt::Debug for UserCreationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCreationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Profile assembled from the identity provider's user, realm role and group data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub groups: Vec<String>,
}
