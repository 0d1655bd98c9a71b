use cucumber::then;

use user_lib::errors_service::{map_error, UserServiceError};

use crate::support::world::TestWorld;

fn violations(world: &TestWorld) -> Vec<(String, String)> {
    match world.create_result.as_ref() {
        Some(Err(UserServiceError::Validation(violations))) => violations
            .iter()
            .map(|v| (v.field.clone(), v.message.clone()))
            .collect(),
        _ => vec![],
    }
}

#[then("the registration succeeds")]
pub async fn registration_succeeds(world: &mut TestWorld) {
    let result = world.create_result.as_ref().expect("registration should have run");
    assert_eq!(result.as_ref().ok().map(String::as_str), Some("kc-bdd-user"));
}

#[then(expr = "the registration is rejected with status {int}")]
pub async fn registration_rejected(world: &mut TestWorld, status: u16) {
    let result = world.create_result.as_ref().expect("registration should have run");
    let err = result.as_ref().expect_err("registration should fail");
    assert_eq!(map_error(err).status, status);
}

#[then(expr = "the field {string} reports {string}")]
pub async fn field_reports(world: &mut TestWorld, field: String, message: String) {
    assert!(
        violations(world).contains(&(field.clone(), message.clone())),
        "expected {field}: {message}"
    );
}

#[then(expr = "the field {string} is {word}")]
pub async fn field_outcome(world: &mut TestWorld, field: String, outcome: String) {
    let flagged = violations(world).iter().any(|(f, _)| *f == field);
    match outcome.as_str() {
        "rejected" => assert!(flagged, "{field} should be rejected"),
        "accepted" => assert!(!flagged, "{field} should be accepted"),
        other => panic!("unknown outcome {other}"),
    }
}

#[then(regex = r"^the identity provider was called (\d+) times?$")]
pub async fn provider_called(world: &mut TestWorld, times: usize) {
    assert_eq!(world.calls(), times);
}

#[then(expr = "every lookup fails with status {int} and message {string}")]
pub async fn lookups_fail(world: &mut TestWorld, status: u16, message: String) {
    assert!(!world.lookup_errors.is_empty());
    for err in &world.lookup_errors {
        assert_eq!(err.status, status);
        assert_eq!(err.message, message);
    }
}
