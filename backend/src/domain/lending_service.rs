//! Lending coordinator: the pick-up/drop-off state machine.
//!
//! The service owns the transition of a book between available and
//! checked-out and the creation/closing of loan records. It holds no mutable
//! state of its own — correctness rests on the loan repository executing
//! each transition as one store transaction — and it checks preconditions in
//! a fixed order so every failure mode keeps its distinct response:
//! book existence, availability, identity, then the open-loan check.
//!
//! Store conflicts (lock/serialization failures) are retried a bounded
//! number of times for the two write operations only; every other failure
//! surfaces immediately.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::domain::Error;
use crate::domain::ports::{
    BookRepository, BookRepositoryError, DropOffRequest, LendingCommand, LendingQuery,
    LoanListResponse, LoanPayload, LoanRepository, LoanRepositoryError, PickUpRequest,
    PickUpResponse,
};
use crate::domain::UserId;

/// Extra attempts after the first conflicted transaction.
const MAX_CONFLICT_RETRIES: u32 = 2;

const NO_BOOK_MESSAGE: &str = "No book with the provided id";
const UNAVAILABLE_MESSAGE: &str = "This book is not available for pick up";
const NO_USER_MESSAGE: &str = "No logged in user";
const ALREADY_PICKED_MESSAGE: &str = "You have picked up this book and you have not dropped it";
const NOT_PICKED_MESSAGE: &str = "You have not picked up this book";

fn map_book_repository_error(error: BookRepositoryError) -> Error {
    match error {
        BookRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("book store unavailable: {message}"))
        }
        BookRepositoryError::Query { message } => {
            Error::internal(format!("book store error: {message}"))
        }
    }
}

fn map_loan_repository_error(error: LoanRepositoryError) -> Error {
    match error {
        LoanRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("loan store unavailable: {message}"))
        }
        LoanRepositoryError::Serialization { message } => {
            Error::service_unavailable(format!("loan store conflicted: {message}"))
        }
        LoanRepositoryError::Query { message } => {
            Error::internal(format!("loan store error: {message}"))
        }
        LoanRepositoryError::BookMissing => Error::not_found(NO_BOOK_MESSAGE),
        LoanRepositoryError::BookUnavailable => Error::book_unavailable(UNAVAILABLE_MESSAGE),
        LoanRepositoryError::AlreadyPicked => Error::already_picked(ALREADY_PICKED_MESSAGE),
        LoanRepositoryError::NoActiveLoan => Error::no_active_loan(NOT_PICKED_MESSAGE),
    }
}

/// Re-run a lending transaction while it loses serialization conflicts,
/// up to [`MAX_CONFLICT_RETRIES`] extra attempts.
async fn retry_conflicts<T, F, Fut>(mut op: F) -> Result<T, LoanRepositoryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LoanRepositoryError>>,
{
    let mut conflicts = 0_u32;
    loop {
        match op().await {
            Err(LoanRepositoryError::Serialization { message })
                if conflicts < MAX_CONFLICT_RETRIES =>
            {
                conflicts += 1;
                debug!(%message, attempt = conflicts, "retrying lending transaction after conflict");
            }
            other => return other,
        }
    }
}

/// Lending coordinator over the book and loan repositories.
#[derive(Clone)]
pub struct LendingService<B, L> {
    books: Arc<B>,
    loans: Arc<L>,
}

impl<B, L> LendingService<B, L> {
    /// Create a coordinator over the given repositories.
    pub fn new(books: Arc<B>, loans: Arc<L>) -> Self {
        Self { books, loans }
    }
}

#[async_trait]
impl<B, L> LendingCommand for LendingService<B, L>
where
    B: BookRepository,
    L: LoanRepository,
{
    async fn pick_up(&self, request: PickUpRequest) -> Result<PickUpResponse, Error> {
        let PickUpRequest {
            book_id,
            requesting_user,
        } = request;

        let book = self
            .books
            .find_by_id(book_id)
            .await
            .map_err(map_book_repository_error)?
            .ok_or_else(|| Error::not_found(NO_BOOK_MESSAGE))?;

        if !book.available {
            return Err(Error::book_unavailable(UNAVAILABLE_MESSAGE));
        }

        let user_id = requesting_user.ok_or_else(|| Error::unauthorized(NO_USER_MESSAGE))?;

        // Defensive: with honest availability this cannot trigger, but a
        // stale read must answer "already held" rather than create a loan.
        if self
            .loans
            .find_open_by_book_and_user(book_id, user_id)
            .await
            .map_err(map_loan_repository_error)?
            .is_some()
        {
            return Err(Error::already_picked(ALREADY_PICKED_MESSAGE));
        }

        let picked_at = Utc::now();
        let loans = Arc::clone(&self.loans);
        let loan_id = retry_conflicts(|| {
            let loans = Arc::clone(&loans);
            async move { loans.checkout(book_id, user_id, picked_at).await }
        })
        .await
        .map_err(map_loan_repository_error)?;

        info!(%book_id, %user_id, %loan_id, "book picked up");
        Ok(PickUpResponse { loan_id })
    }

    async fn drop_off(&self, request: DropOffRequest) -> Result<(), Error> {
        let DropOffRequest {
            book_id,
            requesting_user,
        } = request;

        self.books
            .find_by_id(book_id)
            .await
            .map_err(map_book_repository_error)?
            .ok_or_else(|| Error::not_found(NO_BOOK_MESSAGE))?;

        let user_id = requesting_user.ok_or_else(|| Error::unauthorized(NO_USER_MESSAGE))?;

        self.loans
            .find_open_by_book_and_user(book_id, user_id)
            .await
            .map_err(map_loan_repository_error)?
            .ok_or_else(|| Error::no_active_loan(NOT_PICKED_MESSAGE))?;

        let dropped_at = Utc::now();
        let loans = Arc::clone(&self.loans);
        retry_conflicts(|| {
            let loans = Arc::clone(&loans);
            async move { loans.give_back(book_id, user_id, dropped_at).await }
        })
        .await
        .map_err(map_loan_repository_error)?;

        info!(%book_id, %user_id, "book dropped off");
        Ok(())
    }
}

/// Loan listing queries for the authenticated user.
#[derive(Clone)]
pub struct LendingQueryService<L> {
    loans: Arc<L>,
}

impl<L> LendingQueryService<L> {
    /// Create a query service over the loan repository.
    pub fn new(loans: Arc<L>) -> Self {
        Self { loans }
    }
}

#[async_trait]
impl<L> LendingQuery for LendingQueryService<L>
where
    L: LoanRepository,
{
    async fn current_loans(&self, user_id: UserId) -> Result<LoanListResponse, Error> {
        let loans = self
            .loans
            .list_open_for_user(user_id)
            .await
            .map_err(map_loan_repository_error)?;
        Ok(LoanListResponse {
            loans: loans.into_iter().map(LoanPayload::from).collect(),
        })
    }

    async fn loan_history(&self, user_id: UserId) -> Result<LoanListResponse, Error> {
        let loans = self
            .loans
            .list_all_for_user(user_id)
            .await
            .map_err(map_loan_repository_error)?;
        Ok(LoanListResponse {
            loans: loans.into_iter().map(LoanPayload::from).collect(),
        })
    }
}

#[cfg(test)]
#[path = "lending_service_tests.rs"]
mod tests;
