pub mod auth;

pub use auth::{require_moderator, AuthenticatedUser, JwtVerifier};
