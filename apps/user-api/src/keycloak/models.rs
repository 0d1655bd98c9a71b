use serde::{Deserialize, Serialize};
use user_lib::provider::models::IdentityRecord;

/// User representation from Keycloak Admin API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

impl From<KeycloakUser> for IdentityRecord {
    fn from(user: KeycloakUser) -> Self {
        IdentityRecord {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            enabled: user.enabled,
        }
    }
}

/// Request body for creating a user in Keycloak
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeycloakUserRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub enabled: bool,
    pub credentials: Vec<KeycloakCredential>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakCredential {
    #[serde(rename = "type")]
    pub credential_type: String,
    pub value: String,
    pub temporary: bool,
}

/// Role or group representation; only the name is used.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRepresentation {
    pub name: String,
}

/// Token response from Keycloak
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}
