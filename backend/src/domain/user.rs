//! Registered library user.
//!
//! The email address is the identity key: the session layer resolves a
//! logged-in principal to a stored user by email, and handlers pass the
//! resolved [`UserId`] into the coordinator explicitly. There is no global
//! authentication context.

use crate::domain::UserId;

/// Validation errors for [`EmailAddress`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// The address was empty or whitespace.
    #[error("email address must not be empty")]
    Empty,
    /// The address is missing the `@` separator.
    #[error("email address must contain '@'")]
    MissingAtSign,
}

/// A lightly validated email address used as the identity key.
///
/// Validation is deliberately shallow (non-empty, contains `@`); the
/// external identity provider owns real address verification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and wrap a raw address.
    pub fn new(raw: impl Into<String>) -> Result<Self, EmailValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !raw.contains('@') {
            return Err(EmailValidationError::MissingAtSign);
        }
        Ok(Self(raw))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user. Immutable from the coordinator's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Identity key.
    pub email: EmailAddress,
}
