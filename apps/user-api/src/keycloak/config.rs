use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::constants::{
    KEYCLOAK_CLIENT_ID, KEYCLOAK_CLIENT_SECRET, KEYCLOAK_REALM, KEYCLOAK_TIMEOUT_SECS, KEYCLOAK_URL,
};

const DEFAULT_KEYCLOAK_URL: &str = "http://localhost:18080";
const DEFAULT_KEYCLOAK_REALM: &str = "ITM";
const DEFAULT_KEYCLOAK_CLIENT_ID: &str = "user-api-service";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct KeycloakConfig {
    pub base_url: String,
    pub realm: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub timeout: Duration,
}

impl KeycloakConfig {
    pub fn new(
        base_url: impl Into<String>,
        realm: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            realm: realm.into(),
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Self {
        let base_url =
            std::env::var(KEYCLOAK_URL).unwrap_or_else(|_| DEFAULT_KEYCLOAK_URL.to_string());
        let realm =
            std::env::var(KEYCLOAK_REALM).unwrap_or_else(|_| DEFAULT_KEYCLOAK_REALM.to_string());
        let client_id = std::env::var(KEYCLOAK_CLIENT_ID)
            .unwrap_or_else(|_| DEFAULT_KEYCLOAK_CLIENT_ID.to_string());
        let client_secret = std::env::var(KEYCLOAK_CLIENT_SECRET).unwrap_or_default();
        let timeout_secs: u64 = std::env::var(KEYCLOAK_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            timeout: Duration::from_secs(timeout_secs),
            ..Self::new(base_url, realm, client_id, client_secret)
        }
    }

    pub fn token_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url, self.realm
        )
    }

    pub fn admin_users_url(&self) -> String {
        format!("{}/admin/realms/{}/users", self.base_url, self.realm)
    }

    pub fn admin_user_url(&self, user_id: &str) -> String {
        format!("{}/{}", self.admin_users_url(), user_id)
    }

    pub fn admin_user_realm_roles_url(&self, user_id: &str) -> String {
        format!("{}/role-mappings/realm", self.admin_user_url(user_id))
    }

    pub fn admin_user_groups_url(&self, user_id: &str) -> String {
        format!("{}/groups", self.admin_user_url(user_id))
    }

    pub fn is_configured(&self) -> bool {
        !self.client_secret.expose_secret().is_empty()
    }
}
