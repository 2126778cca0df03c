//! Port for loan persistence and the atomic lending transitions.
//!
//! `checkout` and `give_back` span the loan *and* book rows: each must run
//! as one store transaction so availability and the open-loan set can never
//! be observed out of step (no partial commits). Adapters are required to
//! re-check the book state under a row lock inside that transaction; the
//! coordinator's earlier reads are only there to report precondition
//! failures in the documented order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BookId, Loan, LoanId, UserId};

/// Errors raised by loan repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoanRepositoryError {
    /// Repository connection could not be established.
    #[error("loan repository connection failed: {message}")]
    Connection {
        /// Adapter-provided diagnostic.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("loan repository query failed: {message}")]
    Query {
        /// Adapter-provided diagnostic.
        message: String,
    },
    /// The transaction lost a serialization/lock conflict and may be retried.
    #[error("loan transaction conflicted: {message}")]
    Serialization {
        /// Adapter-provided diagnostic.
        message: String,
    },
    /// The referenced book vanished between read and transaction.
    #[error("book does not exist")]
    BookMissing,
    /// The book was already on loan when the transaction ran.
    #[error("book is not available for pick up")]
    BookUnavailable,
    /// The user already holds an open loan for this book.
    #[error("user already holds an open loan for this book")]
    AlreadyPicked,
    /// No open loan exists for this (book, user) pair.
    #[error("no open loan for this book and user")]
    NoActiveLoan,
}

impl LoanRepositoryError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a retryable serialization-conflict error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// Port for loan reads and the two atomic lending transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Atomically create an open loan and mark the book unavailable.
    ///
    /// Must lock the book row, re-check availability and the absence of an
    /// open loan under the lock, then commit both writes together. Returns
    /// the new loan id.
    async fn checkout(
        &self,
        book_id: BookId,
        user_id: UserId,
        picked_at: DateTime<Utc>,
    ) -> Result<LoanId, LoanRepositoryError>;

    /// Atomically close the user's open loan and mark the book available.
    ///
    /// Fails with [`LoanRepositoryError::NoActiveLoan`] when the pair has no
    /// open loan, which also covers double drop-offs.
    async fn give_back(
        &self,
        book_id: BookId,
        user_id: UserId,
        dropped_at: DateTime<Utc>,
    ) -> Result<(), LoanRepositoryError>;

    /// The open loan for a (book, user) pair, if one exists.
    async fn find_open_by_book_and_user(
        &self,
        book_id: BookId,
        user_id: UserId,
    ) -> Result<Option<Loan>, LoanRepositoryError>;

    /// All open loans held by a user.
    async fn list_open_for_user(&self, user_id: UserId)
    -> Result<Vec<Loan>, LoanRepositoryError>;

    /// Every loan ever associated with a user, open and closed.
    async fn list_all_for_user(&self, user_id: UserId) -> Result<Vec<Loan>, LoanRepositoryError>;
}

/// Fixture implementation with no loans; both transitions report
/// the states an empty store would produce.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoanRepository;

#[async_trait]
impl LoanRepository for FixtureLoanRepository {
    async fn checkout(
        &self,
        _book_id: BookId,
        _user_id: UserId,
        _picked_at: DateTime<Utc>,
    ) -> Result<LoanId, LoanRepositoryError> {
        Err(LoanRepositoryError::BookMissing)
    }

    async fn give_back(
        &self,
        _book_id: BookId,
        _user_id: UserId,
        _dropped_at: DateTime<Utc>,
    ) -> Result<(), LoanRepositoryError> {
        Err(LoanRepositoryError::NoActiveLoan)
    }

    async fn find_open_by_book_and_user(
        &self,
        _book_id: BookId,
        _user_id: UserId,
    ) -> Result<Option<Loan>, LoanRepositoryError> {
        Ok(None)
    }

    async fn list_open_for_user(
        &self,
        _user_id: UserId,
    ) -> Result<Vec<Loan>, LoanRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all_for_user(
        &self,
        _user_id: UserId,
    ) -> Result<Vec<Loan>, LoanRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_has_no_loans() {
        let repo = FixtureLoanRepository;
        assert!(
            repo.list_all_for_user(UserId::new())
                .await
                .expect("fixture list")
                .is_empty()
        );
        assert_eq!(
            repo.give_back(BookId::new(), UserId::new(), Utc::now())
                .await,
            Err(LoanRepositoryError::NoActiveLoan)
        );
    }

    #[test]
    fn serialization_error_formats_message() {
        let err = LoanRepositoryError::serialization("could not serialize access");
        assert!(err.to_string().contains("could not serialize access"));
    }
}
