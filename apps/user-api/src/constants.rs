pub const SERVICE: &str = "user-api";
pub const ENV: &str = "ENV";

pub const LOCAL_ENV: &str = "local";

pub const USER_API_PORT: &str = "USER_API_PORT";

// Keycloak admin client
pub const KEYCLOAK_URL: &str = "KEYCLOAK_URL";
pub const KEYCLOAK_REALM: &str = "KEYCLOAK_REALM";
pub const KEYCLOAK_CLIENT_ID: &str = "KEYCLOAK_CLIENT_ID";
pub const KEYCLOAK_CLIENT_SECRET: &str = "KEYCLOAK_CLIENT_SECRET";
pub const KEYCLOAK_TIMEOUT_SECS: &str = "KEYCLOAK_TIMEOUT_SECS";

// Bearer token verification
pub const JWT_PUBLIC_KEY_PEM: &str = "JWT_PUBLIC_KEY_PEM";
pub const JWT_HMAC_SECRET: &str = "JWT_HMAC_SECRET";
pub const JWT_ISSUER: &str = "JWT_ISSUER";
pub const REQUIRED_ROLE: &str = "REQUIRED_ROLE";

pub const DEFAULT_REQUIRED_ROLE: &str = "MODERATOR";

// Middleware configuration
pub const RATE_LIMIT_PER_MINUTE: &str = "RATE_LIMIT_PER_MINUTE";
pub const RATE_LIMIT_BURST: &str = "RATE_LIMIT_BURST";
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
pub const MAX_BODY_SIZE_BYTES: &str = "MAX_BODY_SIZE_BYTES";
pub const SHUTDOWN_TIMEOUT_SECS: &str = "SHUTDOWN_TIMEOUT_SECS";
