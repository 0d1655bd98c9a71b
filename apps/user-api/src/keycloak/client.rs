use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use user_lib::provider::errors::IdentityProviderError;
use user_lib::provider::models::{IdentityRecord, NewIdentity};
use user_lib::provider::traits::IdentityProvider;

use super::config::KeycloakConfig;
use super::errors::KeycloakError;
use super::models::{
    CreateKeycloakUserRequest, KeycloakCredential, KeycloakUser, NamedRepresentation,
    TokenResponse,
};

/// Seconds shaved off the token lifetime so it is refreshed before Keycloak expires it
const TOKEN_EXPIRY_BUFFER_SECS: u64 = 30;

/// Token with expiration tracking
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn new(token: String, expires_in: u64) -> Self {
        let expires_in = expires_in.saturating_sub(TOKEN_EXPIRY_BUFFER_SECS);
        Self {
            access_token: token,
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        }
    }

    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Extracts the created resource id from a `Location` header value.
fn id_from_location(location: &str) -> Option<&str> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}

async fn unexpected_status(response: Response, operation: &str) -> KeycloakError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            KeycloakError::Unauthorized(format!("{operation} returned status {status}"))
        }
        _ => KeycloakError::RequestFailed(format!(
            "{operation} failed with status {status}: {body}"
        )),
    }
}

/// Admin REST client for a single Keycloak realm, authenticated as a
/// confidential service account (client credentials grant).
pub struct KeycloakClient {
    config: KeycloakConfig,
    http: Client,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl KeycloakClient {
    pub fn new(config: KeycloakConfig) -> Result<Self, KeycloakError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KeycloakError::RequestFailed(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    pub fn realm(&self) -> &str {
        &self.config.realm
    }

    /// Get a valid access token, refreshing if necessary
    async fn get_token(&self) -> Result<String, KeycloakError> {
        if !self.is_configured() {
            return Err(KeycloakError::NotConfigured);
        }

        {
            let token_guard = self.token.read().await;
            if let Some(ref cached) = *token_guard {
                if cached.is_valid() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let new_token = self.fetch_token().await?;
        let token_string = new_token.access_token.clone();

        {
            let mut token_guard = self.token.write().await;
            *token_guard = Some(CachedToken::new(new_token.access_token, new_token.expires_in));
        }

        tracing::debug!(realm = %self.config.realm, "refreshed keycloak service token");
        Ok(token_string)
    }

    /// Drops the cached token so the next call authenticates again
    async fn invalidate_token(&self) {
        let mut token_guard = self.token.write().await;
        *token_guard = None;
    }

    /// Fetch a new token from Keycloak
    async fn fetch_token(&self) -> Result<TokenResponse, KeycloakError> {
        let response = self
            .http
            .post(self.config.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret().as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(KeycloakError::TokenError(format!("status {status}: {body}")));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| KeycloakError::InvalidResponse(e.to_string()))
    }

    async fn fail(&self, response: Response, operation: &str) -> KeycloakError {
        let err = unexpected_status(response, operation).await;
        if matches!(err, KeycloakError::Unauthorized(_)) {
            self.invalidate_token().await;
        }
        err
    }

    async fn fetch_names(&self, url: String, user_id: &str, operation: &str) -> Result<Vec<String>, KeycloakError> {
        let token = self.get_token().await?;
        let response = self.http.get(url).bearer_auth(&token).send().await?;

        match response.status() {
            StatusCode::OK => {
                let items = response
                    .json::<Vec<NamedRepresentation>>()
                    .await
                    .map_err(|e| KeycloakError::InvalidResponse(e.to_string()))?;
                Ok(items.into_iter().map(|item| item.name).collect())
            }
            StatusCode::NOT_FOUND => Err(KeycloakError::UserNotFound(user_id.to_string())),
            _ => Err(self.fail(response, operation).await),
        }
    }

    /// Search users by username (Keycloak performs a substring match)
    pub async fn search_users(&self, username: &str) -> Result<Vec<KeycloakUser>, KeycloakError> {
        let token = self.get_token().await?;

        let response = self
            .http
            .get(self.config.admin_users_url())
            .query(&[("username", username)])
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.fail(response, "search users").await);
        }

        response
            .json::<Vec<KeycloakUser>>()
            .await
            .map_err(|e| KeycloakError::InvalidResponse(e.to_string()))
    }

    /// Create a new user in Keycloak and return its id
    pub async fn create_user(&self, identity: &NewIdentity) -> Result<String, KeycloakError> {
        let token = self.get_token().await?;

        let request = CreateKeycloakUserRequest {
            username: identity.username.clone(),
            email: identity.email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            enabled: identity.enabled,
            credentials: vec![KeycloakCredential {
                credential_type: "password".to_string(),
                value: identity.password.expose_secret().clone(),
                temporary: false,
            }],
        };

        let response = self
            .http
            .post(self.config.admin_users_url())
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|location| location.to_str().ok())
                .and_then(id_from_location)
                .map(String::from)
                .ok_or_else(|| {
                    KeycloakError::InvalidResponse(
                        "missing Location header in create response".to_string(),
                    )
                }),
            StatusCode::CONFLICT => Err(KeycloakError::UserAlreadyExists(identity.username.clone())),
            _ => Err(self.fail(response, "create user").await),
        }
    }

    /// Get a user by Keycloak ID
    pub async fn get_user(&self, user_id: &str) -> Result<Option<KeycloakUser>, KeycloakError> {
        let token = self.get_token().await?;

        let response = self
            .http
            .get(self.config.admin_user_url(user_id))
            .bearer_auth(&token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let user = response
                    .json::<KeycloakUser>()
                    .await
                    .map_err(|e| KeycloakError::InvalidResponse(e.to_string()))?;
                Ok(Some(user))
            }
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(self.fail(response, "get user").await),
        }
    }

    /// Delete a user from Keycloak
    pub async fn delete_user(&self, user_id: &str) -> Result<(), KeycloakError> {
        let token = self.get_token().await?;

        let response = self
            .http
            .delete(self.config.admin_user_url(user_id))
            .bearer_auth(&token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => Err(KeycloakError::UserNotFound(user_id.to_string())),
            _ => Err(self.fail(response, "delete user").await),
        }
    }

    /// Realm-level role names mapped directly to the user
    pub async fn realm_roles(&self, user_id: &str) -> Result<Vec<String>, KeycloakError> {
        self.fetch_names(
            self.config.admin_user_realm_roles_url(user_id),
            user_id,
            "get realm roles",
        )
        .await
    }

    pub async fn groups(&self, user_id: &str) -> Result<Vec<String>, KeycloakError> {
        self.fetch_names(self.config.admin_user_groups_url(user_id), user_id, "get groups")
            .await
    }
}

#[async_trait]
impl IdentityProvider for KeycloakClient {
    async fn search_users(&self, username: &str) -> Result<Vec<IdentityRecord>, IdentityProviderError> {
        let users = KeycloakClient::search_users(self, username).await?;
        Ok(users.into_iter().map(IdentityRecord::from).collect())
    }

    async fn create_user(&self, identity: &NewIdentity) -> Result<String, IdentityProviderError> {
        Ok(KeycloakClient::create_user(self, identity).await?)
    }

    async fn get_user(&self, id: &str) -> Result<Option<IdentityRecord>, IdentityProviderError> {
        Ok(KeycloakClient::get_user(self, id).await?.map(IdentityRecord::from))
    }

    async fn delete_user(&self, id: &str) -> Result<(), IdentityProviderError> {
        Ok(KeycloakClient::delete_user(self, id).await?)
    }

    async fn realm_roles(&self, id: &str) -> Result<Vec<String>, IdentityProviderError> {
        Ok(KeycloakClient::realm_roles(self, id).await?)
    }

    async fn groups(&self, id: &str) -> Result<Vec<String>, IdentityProviderError> {
        Ok(KeycloakClient::groups(self, id).await?)
    }
}
