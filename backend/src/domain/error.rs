//! Domain-level error type shared by every service.
//!
//! The type is transport agnostic: inbound adapters decide how each
//! [`ErrorCode`] maps onto an HTTP status. Lending has two quirky mappings
//! inherited from the behaviour this service preserves — an unavailable book
//! answers `451 Unavailable For Legal Reasons`, and both "already held" and
//! "no active loan" answer `404` rather than `409`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// The requested resource does not exist.
    NotFound,
    /// The book is currently on loan and cannot be picked up.
    BookUnavailable,
    /// The requesting user already holds an open loan for this book.
    AlreadyPicked,
    /// No open loan exists for this (book, user) pair.
    NoActiveLoan,
    /// The request conflicts with current state.
    Conflict,
    /// A collaborator (store, pool) is temporarily unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload surfaced to adapters.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[schema(example = "No book with the provided id")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    details: Option<Value>,
}

/// Validation errors emitted by the fallible constructor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The human-readable message was empty or whitespace.
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create a new error, panicking if validation fails.
    ///
    /// All call sites pass literal, non-empty messages; the panic guards
    /// against regressions rather than runtime input.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary structured details, when attached.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::BookUnavailable`].
    pub fn book_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BookUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::AlreadyPicked`].
    pub fn already_picked(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyPicked, message)
    }

    /// Convenience constructor for [`ErrorCode::NoActiveLoan`].
    pub fn no_active_loan(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoActiveLoan, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Regression coverage for construction and serialisation.

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(Error::not_found("missing"), ErrorCode::NotFound)]
    #[case(Error::book_unavailable("on loan"), ErrorCode::BookUnavailable)]
    #[case(Error::already_picked("held"), ErrorCode::AlreadyPicked)]
    #[case(Error::no_active_loan("never picked"), ErrorCode::NoActiveLoan)]
    #[case(Error::unauthorized("who?"), ErrorCode::Unauthorized)]
    fn constructors_set_the_expected_code(#[case] error: Error, #[case] code: ErrorCode) {
        assert_eq!(error.code(), code);
    }

    #[test]
    fn empty_message_is_rejected() {
        let err = Error::try_new(ErrorCode::NotFound, "   ");
        assert_eq!(err, Err(ErrorValidationError::EmptyMessage));
    }

    #[test]
    fn details_are_omitted_from_json_when_absent() {
        let value = serde_json::to_value(Error::not_found("missing")).expect("serialize");
        assert_eq!(
            value,
            json!({ "code": "not_found", "message": "missing" })
        );
    }

    #[test]
    fn details_round_trip() {
        let error =
            Error::invalid_request("bad field").with_details(json!({ "field": "categoryId" }));
        let value = serde_json::to_value(&error).expect("serialize");
        assert_eq!(value["details"]["field"], "categoryId");
    }
}
