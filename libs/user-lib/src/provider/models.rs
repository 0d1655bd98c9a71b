use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::entities::UserCreationRequest;

/// A user as stored by the identity provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityRecord {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: bool,
}

/// Record handed to the identity provider when registering a user.
#[derive(Debug)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: SecretString,
    pub enabled: bool,
}

impl From<&UserCreationRequest> for NewIdentity {
    fn from(request: &UserCreationRequest) -> Self {
        Self {
            username: request.username.clone(),
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            password: SecretString::new(request.password.clone()),
            enabled: true,
        }
    }
}
