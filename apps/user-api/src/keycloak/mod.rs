mod client;
mod config;
mod errors;
mod models;

pub use client::KeycloakClient;
pub use config::KeycloakConfig;
pub use errors::KeycloakError;
pub use models::KeycloakUser;
