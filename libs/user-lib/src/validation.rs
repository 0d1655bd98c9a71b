use serde::Serialize;
use validator::Validate;

use crate::entities::UserCreationRequest;

pub const USERNAME_LENGTH_MESSAGE: &str = "Username should be between 2 and 30 characters long";
pub const EMAIL_INVALID_MESSAGE: &str = "Email should be valid";
pub const PASSWORD_LENGTH_MESSAGE: &str = "Password should be greater than 4 characters long";

/// A single named-field validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Checks every field rule and returns all violations, sorted by field name.
///
/// An empty result means the request is valid.
pub fn validate(request: &UserCreationRequest) -> Vec<FieldViolation> {
    let errors = match request.validate() {
        Ok(()) => return vec![],
        Err(errors) => errors,
    };

    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            field_errors
                .iter()
                .find_map(|e| e.message.as_ref())
                .map(|message| FieldViolation::new(field.to_string(), message.to_string()))
        })
        .collect();

    violations.sort();
    violations
}
