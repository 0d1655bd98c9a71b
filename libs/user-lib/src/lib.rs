pub mod entities;
pub mod provider;
pub mod validation;
pub mod user_service;
pub mod errors_service;

pub use entities::*;
pub use user_service::*;
pub use errors_service::*;
pub use validation::*;
