use user_lib::provider::errors::IdentityProviderError;

#[derive(Debug, thiserror::Error)]
pub enum KeycloakError {
    /// Failed to obtain a service-account access token
    #[error("token error: {0}")]
    TokenError(String),

    /// Keycloak rejected the access token for an admin call
    #[error("keycloak denied admin request: {0}")]
    Unauthorized(String),

    #[error("user not found in keycloak: {0}")]
    UserNotFound(String),

    #[error("user already exists in keycloak: {0}")]
    UserAlreadyExists(String),

    #[error("keycloak request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from keycloak: {0}")]
    InvalidResponse(String),

    #[error("keycloak is not configured")]
    NotConfigured,
}

impl From<reqwest::Error> for KeycloakError {
    fn from(err: reqwest::Error) -> Self {
        KeycloakError::RequestFailed(err.to_string())
    }
}

impl From<KeycloakError> for IdentityProviderError {
    fn from(err: KeycloakError) -> Self {
        let message = err.to_string();
        match err {
            KeycloakError::UserNotFound(_) => IdentityProviderError::NotFound(message),
            KeycloakError::UserAlreadyExists(username) => IdentityProviderError::Conflict(username),
            KeycloakError::TokenError(msg) | KeycloakError::Unauthorized(msg) => {
                IdentityProviderError::Unauthorized(msg)
            }
            KeycloakError::RequestFailed(msg) => IdentityProviderError::Request(msg),
            KeycloakError::InvalidResponse(msg) => IdentityProviderError::InvalidResponse(msg),
            KeycloakError::NotConfigured => IdentityProviderError::NotConfigured,
        }
    }
}
