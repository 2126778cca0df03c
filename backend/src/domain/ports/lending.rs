//! Driving ports for the lending coordinator.
//!
//! Handlers resolve the session identity once at the boundary and pass it in
//! as an explicit `Option<UserId>`; the coordinator checks it in the
//! documented precondition order (book existence and availability come
//! first, so an anonymous request for a missing book still answers 404).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BookId, Error, Loan, LoanId, UserId};

/// Request to pick up a book.
#[derive(Debug, Clone)]
pub struct PickUpRequest {
    /// Book to pick up.
    pub book_id: BookId,
    /// Resolved session identity, if any.
    pub requesting_user: Option<UserId>,
}

/// Confirmation of a successful pick-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickUpResponse {
    /// Identifier of the freshly created open loan.
    pub loan_id: LoanId,
}

/// Request to drop off a book.
#[derive(Debug, Clone)]
pub struct DropOffRequest {
    /// Book to drop off.
    pub book_id: BookId,
    /// Resolved session identity, if any.
    pub requesting_user: Option<UserId>,
}

/// Loan fields exposed across the port boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanPayload {
    /// Loan identifier.
    pub id: LoanId,
    /// Book this loan references.
    pub book_id: BookId,
    /// User holding (or having held) the book.
    pub user_id: UserId,
    /// Pick-up timestamp.
    pub picked_at: DateTime<Utc>,
    /// Whether the book has been returned.
    pub dropped_off: bool,
    /// Return timestamp, present iff the loan is closed.
    pub dropped_at: Option<DateTime<Utc>>,
}

impl From<Loan> for LoanPayload {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id(),
            book_id: loan.book_id(),
            user_id: loan.user_id(),
            picked_at: loan.picked_at(),
            dropped_off: loan.dropped_off(),
            dropped_at: loan.dropped_at(),
        }
    }
}

/// A list of loans for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanListResponse {
    /// The matching loan records.
    pub loans: Vec<LoanPayload>,
}

/// Command port: the two lending state transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LendingCommand: Send + Sync {
    /// Pick up a book for the requesting user.
    async fn pick_up(&self, request: PickUpRequest) -> Result<PickUpResponse, Error>;

    /// Drop off a book previously picked up by the requesting user.
    async fn drop_off(&self, request: DropOffRequest) -> Result<(), Error>;
}

/// Query port: loan listings for the authenticated user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LendingQuery: Send + Sync {
    /// All open loans held by the user.
    async fn current_loans(&self, user_id: UserId) -> Result<LoanListResponse, Error>;

    /// Every loan ever associated with the user.
    async fn loan_history(&self, user_id: UserId) -> Result<LoanListResponse, Error>;
}

/// Fixture command port for wiring tests; behaves like an empty library.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLendingCommand;

#[async_trait]
impl LendingCommand for FixtureLendingCommand {
    async fn pick_up(&self, _request: PickUpRequest) -> Result<PickUpResponse, Error> {
        Err(Error::not_found("No book with the provided id"))
    }

    async fn drop_off(&self, _request: DropOffRequest) -> Result<(), Error> {
        Err(Error::not_found("No book with the provided id"))
    }
}

/// Fixture query port returning no loans.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLendingQuery;

#[async_trait]
impl LendingQuery for FixtureLendingQuery {
    async fn current_loans(&self, _user_id: UserId) -> Result<LoanListResponse, Error> {
        Ok(LoanListResponse { loans: Vec::new() })
    }

    async fn loan_history(&self, _user_id: UserId) -> Result<LoanListResponse, Error> {
        Ok(LoanListResponse { loans: Vec::new() })
    }
}
