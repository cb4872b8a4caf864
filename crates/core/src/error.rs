//! Expected-failure values carried through the request pipeline.
//!
//! Handlers and pipeline stages return [`DomainError`] instead of raising;
//! only programmer or infrastructure faults may panic.

use serde::{Deserialize, Serialize};

/// Broad failure class, used to map an error onto a transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    NotFound,
    Validation,
    Conflict,
    Failure,
}

/// A stable error code plus human-readable message.
///
/// Equality is structural, so errors can be compared in tests and
/// deduplicated by callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct DomainError {
    pub code: String,
    pub message: String,
    pub category: ErrorCategory,
}

/// Convenience alias for handler and stage return values.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    fn new(code: impl Into<String>, message: impl Into<String>, category: ErrorCategory) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            category,
        }
    }

    /// A referenced entity does not exist.
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorCategory::NotFound)
    }

    /// The request was rejected before reaching its handler.
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorCategory::Validation)
    }

    /// Completing the operation would violate an invariant.
    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorCategory::Conflict)
    }

    /// Infrastructure or storage could not complete the operation.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorCategory::Failure)
    }
}

/// Error codes owned by the mediator itself.
pub mod codes {
    /// No handler registered for the dispatched request type.
    pub const HANDLER_MISSING: &str = "mediator.handler_missing";
    /// More than one handler or validator registered for a request type.
    pub const DUPLICATE_REGISTRATION: &str = "mediator.duplicate_registration";
    /// A request or response failed to downcast to its concrete type.
    pub const TYPE_MISMATCH: &str = "mediator.type_mismatch";
    /// The request's validator reported field violations.
    pub const REQUEST_INVALID: &str = "request.invalid";
    /// The caller's cancellation token was tripped before completion.
    pub const REQUEST_CANCELLED: &str = "request.cancelled";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories_tag_their_category() {
        assert_eq!(
            DomainError::not_found("Template.NotFound", "missing").category,
            ErrorCategory::NotFound
        );
        assert_eq!(
            DomainError::validation("request.invalid", "bad").category,
            ErrorCategory::Validation
        );
        assert_eq!(
            DomainError::conflict("Template.Conflict", "taken").category,
            ErrorCategory::Conflict
        );
        assert_eq!(
            DomainError::failure("Template.StorageFailed", "io").category,
            ErrorCategory::Failure
        );
    }

    #[test]
    fn equality_is_structural() {
        let a = DomainError::not_found("Template.NotFound", "no template with id 7");
        let b = DomainError::not_found("Template.NotFound", "no template with id 7");
        assert_eq!(a, b);

        let c = DomainError::failure("Template.NotFound", "no template with id 7");
        assert_ne!(a, c);
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = DomainError::failure("Template.StorageFailed", "disk full");
        assert_eq!(err.to_string(), "Template.StorageFailed: disk full");
    }

    #[test]
    fn serializes_with_lowercase_category() {
        let err = DomainError::validation("request.invalid", "name: must not be empty");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["category"], "validation");
        assert_eq!(json["code"], "request.invalid");
    }
}
