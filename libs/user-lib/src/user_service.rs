use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{UserCreationRequest, UserProfile};
use crate::errors_service::{UserServiceError, USER_NOT_FOUND_MESSAGE};
use crate::provider::errors::IdentityProviderError;
use crate::provider::models::{IdentityRecord, NewIdentity};
use crate::provider::traits::IdentityProvider;
use crate::validation::validate;

fn user_not_found() -> UserServiceError {
    UserServiceError::NotFound(USER_NOT_FOUND_MESSAGE.to_string())
}

/// A user removed after `get_user` succeeded reads the same as one that never existed.
fn vanished_as_not_found(err: IdentityProviderError) -> UserServiceError {
    match err {
        IdentityProviderError::NotFound(_) => user_not_found(),
        other => UserServiceError::from(other),
    }
}

fn profile_from_record(record: IdentityRecord, roles: Vec<String>, groups: Vec<String>) -> UserProfile {
    UserProfile {
        first_name: record.first_name.unwrap_or_default(),
        last_name: record.last_name.unwrap_or_default(),
        email: record.email.unwrap_or_default(),
        roles,
        groups,
    }
}

/// Stateless pass-through to the identity provider.
///
/// Validation happens before any provider call; there are no retries and no
/// compensating actions.
pub struct UserService<P = dyn IdentityProvider>
where
    P: IdentityProvider + ?Sized,
{
    pub provider: Arc<P>,
}

impl<P> Clone for UserService<P>
where
    P: IdentityProvider + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl UserService<dyn IdentityProvider> {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }
}

impl<P> UserService<P>
where
    P: IdentityProvider + ?Sized,
{
    pub fn with_provider(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Registers a user and returns the id assigned by the provider.
    pub async fn create_user(&self, request: &UserCreationRequest) -> Result<String, UserServiceError> {
        let violations = validate(request);
        if !violations.is_empty() {
            return Err(UserServiceError::Validation(violations));
        }

        let identity = NewIdentity::from(request);
        let user_id = self
            .provider
            .create_user(&identity)
            .await
            .map_err(UserServiceError::from)?;

        tracing::info!(user_id = %user_id, username = %request.username, "user created");
        Ok(user_id)
    }

    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<UserProfile, UserServiceError> {
        let id = user_id.to_string();

        let record = self
            .provider
            .get_user(&id)
            .await?
            .ok_or_else(user_not_found)?;

        let roles = self
            .provider
            .realm_roles(&id)
            .await
            .map_err(vanished_as_not_found)?;
        let groups = self
            .provider
            .groups(&id)
            .await
            .map_err(vanished_as_not_found)?;

        Ok(profile_from_record(record, roles, groups))
    }

    /// The provider's search is a substring match, so only an exact
    /// (case-insensitive) username hit is returned.
    pub async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<IdentityRecord>, UserServiceError> {
        let wanted = username.to_lowercase();
        let candidates = self.provider.search_users(username).await?;
        Ok(candidates
            .into_iter()
            .find(|record| record.username.to_lowercase() == wanted))
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), UserServiceError> {
        self.provider
            .delete_user(&user_id.to_string())
            .await
            .map_err(UserServiceError::from)?;

        tracing::info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    /// Returns `true` when a matching user existed and was removed.
    pub async fn remove_user_if_exists(&self, username: &str) -> Result<bool, UserServiceError> {
        match self.find_user_by_username(username).await? {
            Some(record) => {
                self.provider.delete_user(&record.id).await?;
                tracing::info!(user_id = %record.id, username = %username, "user removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
