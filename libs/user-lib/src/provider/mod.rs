pub mod errors;
pub mod models;
pub mod traits;

pub use errors::IdentityProviderError;
pub use models::{IdentityRecord, NewIdentity};
pub use traits::IdentityProvider;
