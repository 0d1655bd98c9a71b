use std::sync::Arc;
use async_trait::async_trait;
use mockall::mock;
use mockall::Sequence;
use secrecy::ExposeSecret;
use uuid::Uuid;

use user_lib::entities::UserCreationRequest;
use user_lib::errors_service::{map_error, UserServiceError, INTERNAL_ERROR_MESSAGE};
use user_lib::provider::errors::IdentityProviderError;
use user_lib::provider::models::{IdentityRecord, NewIdentity};
use user_lib::provider::traits::IdentityProvider;
use user_lib::user_service::UserService;
use user_lib::validation::{EMAIL_INVALID_MESSAGE, PASSWORD_LENGTH_MESSAGE, USERNAME_LENGTH_MESSAGE};

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

fn create_test_service(provider: MockProvider) -> UserService<MockProvider> {
    UserService::with_provider(Arc::new(provider))
}

fn valid_request() -> UserCreationRequest {
    UserCreationRequest::new(
        "testUsername",
        "testEmail@mail.ru",
        "testPassword",
        "testFirstName",
        "testLastName",
    )
}

fn record(id: &str, username: &str) -> IdentityRecord {
    IdentityRecord {
        id: id.to_string(),
        username: username.to_lowercase(),
        email: Some("testemail@mail.ru".to_string()),
        first_name: Some("testFirstName".to_string()),
        last_name: Some("testLastName".to_string()),
        enabled: true,
    }
}

// ==================== CREATE USER TESTS ====================

#[tokio::test]
async fn test_create_user_success() {
    let mut provider = MockProvider::new();
    provider
        .expect_create_user()
        .withf(|identity| {
            identity.username == "testUsername"
                && identity.email == "testEmail@mail.ru"
                && identity.first_name == "testFirstName"
                && identity.last_name == "testLastName"
                && identity.password.expose_secret() == "testPassword"
                && identity.enabled
        })
        .times(1)
        .returning(|_| Ok("kc-user-12345".to_string()));

    let service = create_test_service(provider);
    let result = service.create_user(&valid_request()).await;

    assert_eq!(result.unwrap(), "kc-user-12345");
}

#[tokio::test]
async fn test_create_user_validation_skips_provider() {
    let mut provider = MockProvider::new();
    provider.expect_create_user().times(0);

    let service = create_test_service(provider);
    let request = UserCreationRequest::new("1", "email", "123", "", "");

    let err = service.create_user(&request).await.unwrap_err();

    match err {
        UserServiceError::Validation(violations) => {
            let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
            assert_eq!(violations.len(), 3);
            assert!(messages.contains(&USERNAME_LENGTH_MESSAGE));
            assert!(messages.contains(&EMAIL_INVALID_MESSAGE));
            assert!(messages.contains(&PASSWORD_LENGTH_MESSAGE));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_user_conflict_is_unhandled() {
    let mut provider = MockProvider::new();
    provider
        .expect_create_user()
        .times(1)
        .returning(|identity| Err(IdentityProviderError::Conflict(identity.username.clone())));

    let service = create_test_service(provider);
    let err = service.create_user(&valid_request()).await.unwrap_err();

    assert!(matches!(err, UserServiceError::Internal(_)));
    let mapped = map_error(&err);
    assert_eq!(mapped.status, 500);
    assert_eq!(mapped.message, INTERNAL_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_create_user_provider_down_is_unhandled() {
    let mut provider = MockProvider::new();
    provider
        .expect_create_user()
        .times(1)
        .returning(|_| Err(IdentityProviderError::Request("connection refused".to_string())));

    let service = create_test_service(provider);
    let err = service.create_user(&valid_request()).await.unwrap_err();

    let mapped = map_error(&err);
    assert_eq!(mapped.status, 500);
    assert!(!mapped.message.contains("connection refused"));
}

// ==================== GET USER BY ID TESTS ====================

#[tokio::test]
async fn test_get_user_by_id_success() {
    let user_id = Uuid::new_v4();
    let expected_id = user_id.to_string();
    let mut provider = MockProvider::new();

    let id = expected_id.clone();
    provider
        .expect_get_user()
        .withf(move |requested| requested == id)
        .times(1)
        .returning(|id| Ok(Some(record(id, "testUsername"))));
    provider
        .expect_realm_roles()
        .times(1)
        .returning(|_| {
            Ok(vec![
                "ROLE_MODERATOR".to_string(),
                "offline_access".to_string(),
                "ROLE_MODERATOR".to_string(),
            ])
        });
    provider
        .expect_groups()
        .times(1)
        .returning(|_| Ok(vec!["Moderators".to_string()]));

    let service = create_test_service(provider);
    let profile = service.get_user_by_id(user_id).await.unwrap();

    assert_eq!(profile.first_name, "testFirstName");
    assert_eq!(profile.last_name, "testLastName");
    assert_eq!(profile.email, "testemail@mail.ru");
    assert_eq!(
        profile.roles,
        vec!["ROLE_MODERATOR", "offline_access", "ROLE_MODERATOR"]
    );
    assert_eq!(profile.groups, vec!["Moderators"]);
}

#[tokio::test]
async fn test_get_user_by_id_missing_fields_default_to_empty() {
    let mut provider = MockProvider::new();
    provider.expect_get_user().returning(|id| {
        Ok(Some(IdentityRecord {
            id: id.to_string(),
            username: "bare".to_string(),
            ..Default::default()
        }))
    });
    provider.expect_realm_roles().returning(|_| Ok(vec![]));
    provider.expect_groups().returning(|_| Ok(vec![]));

    let service = create_test_service(provider);
    let profile = service.get_user_by_id(Uuid::new_v4()).await.unwrap();

    assert_eq!(profile.email, "");
    assert_eq!(profile.first_name, "");
    assert!(profile.roles.is_empty());
    assert!(profile.groups.is_empty());
}

#[tokio::test]
async fn test_get_user_by_id_not_found() {
    let mut provider = MockProvider::new();
    provider.expect_get_user().times(1).returning(|_| Ok(None));
    provider.expect_realm_roles().times(0);

    let service = create_test_service(provider);
    let err = service.get_user_by_id(Uuid::new_v4()).await.unwrap_err();

    let mapped = map_error(&err);
    assert_eq!(mapped.status, 404);
    assert_eq!(mapped.message, "User not found");
}

#[tokio::test]
async fn test_get_user_by_id_not_found_is_repeatable() {
    let mut provider = MockProvider::new();
    provider.expect_get_user().times(3).returning(|_| Ok(None));

    let service = create_test_service(provider);
    let user_id = Uuid::new_v4();

    let mut seen = Vec::new();
    for _ in 0..3 {
        let err = service.get_user_by_id(user_id).await.unwrap_err();
        seen.push(map_error(&err));
    }

    assert!(seen.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn test_get_user_by_id_roles_failure_is_unhandled() {
    let mut provider = MockProvider::new();
    provider
        .expect_get_user()
        .returning(|id| Ok(Some(record(id, "testUsername"))));
    provider
        .expect_realm_roles()
        .returning(|_| Err(IdentityProviderError::InvalidResponse("not json".to_string())));

    let service = create_test_service(provider);
    let err = service.get_user_by_id(Uuid::new_v4()).await.unwrap_err();

    assert_eq!(map_error(&err).status, 500);
}

#[tokio::test]
async fn test_get_user_deleted_between_calls_is_not_found() {
    let mut provider = MockProvider::new();
    provider
        .expect_get_user()
        .returning(|id| Ok(Some(record(id, "testUsername"))));
    provider
        .expect_realm_roles()
        .returning(|id| Err(IdentityProviderError::NotFound(format!("user {id} not found"))));

    let service = create_test_service(provider);
    let err = service.get_user_by_id(Uuid::new_v4()).await.unwrap_err();

    let mapped = map_error(&err);
    assert_eq!(mapped.status, 404);
    assert_eq!(mapped.message, "User not found");
}

#[tokio::test]
async fn test_get_user_groups_vanished_is_not_found() {
    let mut provider = MockProvider::new();
    provider
        .expect_get_user()
        .returning(|id| Ok(Some(record(id, "testUsername"))));
    provider.expect_realm_roles().returning(|_| Ok(vec![]));
    provider
        .expect_groups()
        .returning(|id| Err(IdentityProviderError::NotFound(id.to_string())));

    let service = create_test_service(provider);
    let err = service.get_user_by_id(Uuid::new_v4()).await.unwrap_err();

    assert_eq!(map_error(&err).message, "User not found");
}

// ==================== SEARCH / DELETE TESTS ====================

#[tokio::test]
async fn test_find_user_by_username_exact_match_only() {
    let mut provider = MockProvider::new();
    provider
        .expect_search_users()
        .withf(|username| username == "testUsername")
        .times(1)
        .returning(|_| {
            Ok(vec![
                record("kc-1", "testUsername2"),
                record("kc-2", "testUsername"),
            ])
        });

    let service = create_test_service(provider);
    let found = service.find_user_by_username("testUsername").await.unwrap();

    assert_eq!(found.map(|r| r.id), Some("kc-2".to_string()));
}

#[tokio::test]
async fn test_find_user_by_username_none() {
    let mut provider = MockProvider::new();
    provider.expect_search_users().returning(|_| Ok(vec![]));

    let service = create_test_service(provider);

    assert!(service.find_user_by_username("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_remove_user_if_exists_deletes_match() {
    let mut provider = MockProvider::new();
    let mut seq = Sequence::new();
    provider
        .expect_search_users()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(vec![record("kc-42", "testUsername")]));
    provider
        .expect_delete_user()
        .withf(|id| id == "kc-42")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let service = create_test_service(provider);

    assert!(service.remove_user_if_exists("testUsername").await.unwrap());
}

#[tokio::test]
async fn test_remove_user_if_exists_noop_when_absent() {
    let mut provider = MockProvider::new();
    provider.expect_search_users().returning(|_| Ok(vec![]));
    provider.expect_delete_user().times(0);

    let service = create_test_service(provider);

    assert!(!service.remove_user_if_exists("testUsername").await.unwrap());
}

#[tokio::test]
async fn test_delete_user_not_found_maps_to_404() {
    let mut provider = MockProvider::new();
    provider
        .expect_delete_user()
        .times(1)
        .returning(|_| Err(IdentityProviderError::NotFound("User not found".to_string())));

    let service = create_test_service(provider);
    let err = service.delete_user(Uuid::new_v4()).await.unwrap_err();

    assert_eq!(map_error(&err).status, 404);
}

#[tokio::test]
async fn test_service_works_behind_dyn_provider() {
    let mut provider = MockProvider::new();
    provider.expect_get_user().returning(|_| Ok(None));

    let service: UserService = UserService::new(Arc::new(provider));
    let err = service.get_user_by_id(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, UserServiceError::NotFound(_)));
}
