use std::sync::atomic::Ordering;

use cucumber::when;

use user_lib::errors_service::map_error;
use user_lib::provider::errors::IdentityProviderError;

use crate::support::world::TestWorld;

#[when("the registration is submitted")]
pub async fn submit_registration(world: &mut TestWorld) {
    let request = world.request.clone().expect("registration should be prepared");
    let calls = world.provider_calls.clone();
    let taken = world.username_taken;

    let service = world.create_service_with_mock(move |provider| {
        provider.expect_create_user().returning(move |identity| {
            calls.fetch_add(1, Ordering::SeqCst);
            if taken {
                Err(IdentityProviderError::Conflict(identity.username.clone()))
            } else {
                Ok("kc-bdd-user".to_string())
            }
        });
    });

    world.create_result = Some(service.create_user(&request).await);
}

#[when(expr = "the user is looked up {int} times")]
pub async fn look_up_user(world: &mut TestWorld, times: usize) {
    let user_id = world.lookup_id.expect("lookup id should be set");
    let service = world.create_service_with_mock(|provider| {
        provider.expect_get_user().returning(|_| Ok(None));
    });

    for _ in 0..times {
        if let Err(e) = service.get_user_by_id(user_id).await {
            world.lookup_errors.push(map_error(&e));
        }
    }
}
