use cucumber::given;
use uuid::Uuid;

use user_lib::entities::UserCreationRequest;

use crate::support::world::TestWorld;

#[given(expr = "a registration with username {string}, email {string} and password {string}")]
pub async fn registration(world: &mut TestWorld, username: String, email: String, password: String) {
    *world = TestWorld::default();
    world.request = Some(UserCreationRequest::new(
        username,
        email,
        password,
        "testFirstName",
        "testLastName",
    ));
}

#[given("the identity provider already holds that username")]
pub async fn username_taken(world: &mut TestWorld) {
    world.username_taken = true;
}

#[given("no user exists for a random id")]
pub async fn no_user(world: &mut TestWorld) {
    *world = TestWorld::default();
    world.lookup_id = Some(Uuid::new_v4());
}
