use secrecy::SecretString;
use std::time::Duration;

use crate::constants::{
    CORS_ALLOWED_ORIGINS, DEFAULT_REQUIRED_ROLE, JWT_HMAC_SECRET, JWT_ISSUER, JWT_PUBLIC_KEY_PEM,
    MAX_BODY_SIZE_BYTES, RATE_LIMIT_BURST, RATE_LIMIT_PER_MINUTE, REQUEST_TIMEOUT_SECS,
    REQUIRED_ROLE, SHUTDOWN_TIMEOUT_SECS,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("either JWT_PUBLIC_KEY_PEM or JWT_HMAC_SECRET must be set")]
    MissingJwtKey,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    pub rate_limit_per_minute: u32,
    pub rate_limit_burst: u32,
    pub request_timeout: Duration,
    pub max_body_size: usize,
    pub shutdown_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 100,
            rate_limit_burst: 150,
            request_timeout: Duration::from_secs(30),
            max_body_size: 1_048_576, // 1MB
            shutdown_timeout: Duration::from_secs(30),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl MiddlewareConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        let rate_limit_per_minute = std::env::var(RATE_LIMIT_PER_MINUTE)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u32| *v > 0)
            .unwrap_or(default.rate_limit_per_minute);

        let rate_limit_burst = std::env::var(RATE_LIMIT_BURST)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u32| *v > 0)
            .unwrap_or(default.rate_limit_burst);

        let request_timeout = std::env::var(REQUEST_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(default.request_timeout);

        let max_body_size = std::env::var(MAX_BODY_SIZE_BYTES)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default.max_body_size);

        let shutdown_timeout = std::env::var(SHUTDOWN_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(default.shutdown_timeout);

        let cors_allowed_origins = std::env::var(CORS_ALLOWED_ORIGINS)
            .ok()
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(default.cors_allowed_origins);

        Self {
            rate_limit_per_minute,
            rate_limit_burst,
            request_timeout,
            max_body_size,
            shutdown_timeout,
            cors_allowed_origins,
        }
    }

    /// Milliseconds between replenished rate-limit permits.
    pub fn replenish_interval_ms(&self) -> u64 {
        (60_000 / u64::from(self.rate_limit_per_minute.max(1))).max(1)
    }
}

/// Key material used to verify bearer tokens.
#[derive(Debug, Clone)]
pub enum JwtKey {
    /// PEM-encoded RSA public key of the realm (RS256)
    RsaPem(String),
    /// Shared secret (HS256)
    Hmac(SecretString),
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub key: JwtKey,
    pub issuer: Option<String>,
    pub required_role: String,
}

impl AuthConfig {
    pub fn new(key: JwtKey) -> Self {
        Self {
            key,
            issuer: None,
            required_role: DEFAULT_REQUIRED_ROLE.to_string(),
        }
    }

    /// The RSA public key wins when both key variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key = match (non_empty_var(JWT_PUBLIC_KEY_PEM), non_empty_var(JWT_HMAC_SECRET)) {
            (Some(pem), _) => JwtKey::RsaPem(pem),
            (None, Some(secret)) => JwtKey::Hmac(SecretString::new(secret)),
            (None, None) => return Err(ConfigError::MissingJwtKey),
        };

        Ok(Self {
            key,
            issuer: non_empty_var(JWT_ISSUER),
            required_role: non_empty_var(REQUIRED_ROLE)
                .unwrap_or_else(|| DEFAULT_REQUIRED_ROLE.to_string()),
        })
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_required_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = role.into();
        self
    }
}
