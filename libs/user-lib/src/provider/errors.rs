/// Failures reported by an identity-provider client.
///
/// Only `NotFound` carries meaning for callers; every other variant is treated
/// as an unhandled failure by the service layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityProviderError {
    #[error("{0}")]
    NotFound(String),

    #[error("identity already exists: {0}")]
    Conflict(String),

    #[error("identity provider rejected credentials: {0}")]
    Unauthorized(String),

    #[error("identity provider request failed: {0}")]
    Request(String),

    #[error("invalid response from identity provider: {0}")]
    InvalidResponse(String),

    #[error("identity provider is not configured")]
    NotConfigured,
}
