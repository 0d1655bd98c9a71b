//! Bearer token authentication for the user endpoints.
//!
//! Tokens are realm access tokens issued by Keycloak. Only the signature,
//! expiry, optional issuer, and the realm roles are inspected.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::{AuthConfig, JwtKey};
use crate::error::ApiError;
use crate::state::AppState;

/// Clock skew tolerated on `exp`/`nbf`
const LEEWAY_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing or invalid Authorization header")]
    MissingToken,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("invalid verification key: {0}")]
    InvalidKey(String),

    #[error("missing required role {0}")]
    MissingRole(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingRole(_) => ApiError::Forbidden(err.to_string()),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidToken("bad signature".to_string()),
        ErrorKind::InvalidAlgorithm => AuthError::InvalidToken("unexpected algorithm".to_string()),
        ErrorKind::InvalidIssuer => AuthError::InvalidToken("unexpected issuer".to_string()),
        ErrorKind::MissingRequiredClaim(claim) => {
            AuthError::InvalidToken(format!("missing claim {claim}"))
        }
        _ => AuthError::InvalidToken("malformed token".to_string()),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The subset of Keycloak access-token claims this service reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub realm_access: RealmAccess,
}

impl AccessClaims {
    pub fn has_role(&self, role: &str) -> bool {
        self.realm_access.roles.iter().any(|r| r == role)
    }
}

/// Caller identity injected into request extensions after authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub subject: String,
    pub username: String,
}

impl From<AccessClaims> for AuthenticatedUser {
    fn from(claims: AccessClaims) -> Self {
        let username = claims
            .preferred_username
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| claims.sub.clone());
        Self {
            subject: claims.sub,
            username,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
    required_role: String,
}

impl JwtVerifier {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let (key, algorithm) = match &config.key {
            JwtKey::RsaPem(pem) => (
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AuthError::InvalidKey(e.to_string()))?,
                Algorithm::RS256,
            ),
            JwtKey::Hmac(secret) => (
                DecodingKey::from_secret(secret.expose_secret().as_bytes()),
                Algorithm::HS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = LEEWAY_SECS;
        // Keycloak puts the client in `azp`; `aud` is not stable across realms
        validation.validate_aud = false;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "iss"]);
        }

        Ok(Self {
            key,
            validation,
            required_role: config.required_role.clone(),
        })
    }

    pub fn verify(&self, token: &str) -> Result<AccessClaims, AuthError> {
        decode::<AccessClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)
    }

    /// Verifies the token and checks it carries the required realm role.
    pub fn authorize(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.verify(token)?;
        if !claims.has_role(&self.required_role) {
            return Err(AuthError::MissingRole(self.required_role.clone()));
        }
        Ok(AuthenticatedUser::from(claims))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Rejects requests whose bearer token is absent, invalid, or lacks the
/// moderator role, and stores the caller as [`AuthenticatedUser`].
pub async fn require_moderator(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or(AuthError::MissingToken)?;

    let user = state.verifier.authorize(token).map_err(|err| {
        tracing::debug!(error = %err, path = %request.uri().path(), "request rejected by auth");
        err
    })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
