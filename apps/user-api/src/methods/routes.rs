// User endpoints, all behind the moderator role
pub const USERS_PATH: &str = "/api/users";
pub const USERS_BY_ID_PATH: &str = "/api/users/{id}";
pub const USERS_HELLO_PATH: &str = "/api/users/hello";

// Root-level service routes (unauthenticated)
pub const SERVICE_HEALTH_PATH: &str = "/health";
pub const SERVICE_DOCS_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";
