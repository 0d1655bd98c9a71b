use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cucumber::World;
use mockall::mock;
use uuid::Uuid;

use user_lib::entities::UserCreationRequest;
use user_lib::errors_service::{ServiceError, UserServiceError};
use user_lib::provider::errors::IdentityProviderError;
use user_lib::provider::models::{IdentityRecord, NewIdentity};
use user_lib::provider::traits::IdentityProvider;
use user_lib::user_service::UserService;

mock! {
    pub Provider {}

    #[async_trait]
    impl IdentityProvider for Provider {
        async fn search_users(&self, username: &str) -> Result<Vec<IdentityRecord>, IdentityProviderError>;
        async fn create_user(&self, identity: &NewIdentity) -> Result<String, IdentityProviderError>;
        async fn get_user(&self, id: &str) -> Result<Option<IdentityRecord>, IdentityProviderError>;
        async fn delete_user(&self, id: &str) -> Result<(), IdentityProviderError>;
        async fn realm_roles(&self, id: &str) -> Result<Vec<String>, IdentityProviderError>;
        async fn groups(&self, id: &str) -> Result<Vec<String>, IdentityProviderError>;
    }
}

#[derive(Debug, Default, World)]
pub struct TestWorld {
    // State
    pub request: Option<UserCreationRequest>,
    pub username_taken: bool,
    pub lookup_id: Option<Uuid>,
    pub provider_calls: Arc<AtomicUsize>,

    // Results
    pub create_result: Option<Result<String, UserServiceError>>,
    pub lookup_errors: Vec<ServiceError>,
}

impl TestWorld {
    pub fn create_service_with_mock(
        &self,
        setup_provider: impl FnOnce(&mut MockProvider),
    ) -> UserService<MockProvider> {
        let mut provider = MockProvider::new();
        setup_provider(&mut provider);
        UserService::with_provider(Arc::new(provider))
    }

    pub fn calls(&self) -> usize {
        self.provider_calls.load(Ordering::SeqCst)
    }
}
