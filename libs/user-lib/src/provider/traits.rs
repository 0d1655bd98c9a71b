use async_trait::async_trait;

use crate::provider::errors::IdentityProviderError;
use crate::provider::models::{IdentityRecord, NewIdentity};

/// Admin operations the service needs from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn search_users(&self, username: &str) -> Result<Vec<IdentityRecord>, IdentityProviderError>;
    async fn create_user(&self, identity: &NewIdentity) -> Result<String, IdentityProviderError>;
    async fn get_user(&self, id: &str) -> Result<Option<IdentityRecord>, IdentityProviderError>;
    async fn delete_user(&self, id: &str) -> Result<(), IdentityProviderError>;
    async fn realm_roles(&self, id: &str) -> Result<Vec<String>, IdentityProviderError>;
    async fn groups(&self, id: &str) -> Result<Vec<String>, IdentityProviderError>;
}
