use std::sync::Arc;
use user_lib::user_service::UserService;

use crate::middleware::JwtVerifier;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub verifier: Arc<JwtVerifier>,
    pub env: String,
}
