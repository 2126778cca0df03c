//! Tests for the lending coordinator.
//!
//! Precondition ordering, the happy paths, the defensive already-held check,
//! and conflict-retry behaviour, all over mocked repositories.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockall::predicate::eq;

use super::*;
use crate::domain::ports::{MockBookRepository, MockLoanRepository};
use crate::domain::{Book, BookId, CategoryId, ErrorCode, Loan, LoanId};

fn shelved_book(book_id: BookId, available: bool) -> Book {
    Book {
        id: book_id,
        name: "Dune".to_owned(),
        author: "Frank Herbert".to_owned(),
        category_id: CategoryId::new(),
        available,
    }
}

fn books_returning(book: Option<Book>) -> MockBookRepository {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(book));
    books
}

fn service(
    books: MockBookRepository,
    loans: MockLoanRepository,
) -> LendingService<MockBookRepository, MockLoanRepository> {
    LendingService::new(Arc::new(books), Arc::new(loans))
}

#[tokio::test]
async fn pick_up_creates_a_loan_for_an_available_book() {
    let book_id = BookId::new();
    let user_id = UserId::new();
    let loan_id = LoanId::new();

    let books = books_returning(Some(shelved_book(book_id, true)));
    let mut loans = MockLoanRepository::new();
    loans
        .expect_find_open_by_book_and_user()
        .with(eq(book_id), eq(user_id))
        .times(1)
        .return_once(|_, _| Ok(None));
    loans
        .expect_checkout()
        .with(eq(book_id), eq(user_id), mockall::predicate::always())
        .times(1)
        .return_once(move |_, _, _| Ok(loan_id));

    let response = service(books, loans)
        .pick_up(PickUpRequest {
            book_id,
            requesting_user: Some(user_id),
        })
        .await
        .expect("pick up succeeds");

    assert_eq!(response.loan_id, loan_id);
}

#[tokio::test]
async fn pick_up_reports_unknown_books_before_anything_else() {
    let books = books_returning(None);
    let mut loans = MockLoanRepository::new();
    loans.expect_find_open_by_book_and_user().times(0);
    loans.expect_checkout().times(0);

    // Anonymous request: book existence is still checked first, so the
    // answer is "no such book", not "no logged in user".
    let error = service(books, loans)
        .pick_up(PickUpRequest {
            book_id: BookId::new(),
            requesting_user: None,
        })
        .await
        .expect_err("unknown book");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "No book with the provided id");
}

#[tokio::test]
async fn pick_up_rejects_unavailable_books_for_any_user() {
    let book_id = BookId::new();
    let books = books_returning(Some(shelved_book(book_id, false)));
    let mut loans = MockLoanRepository::new();
    loans.expect_checkout().times(0);

    let error = service(books, loans)
        .pick_up(PickUpRequest {
            book_id,
            requesting_user: Some(UserId::new()),
        })
        .await
        .expect_err("book on loan");

    assert_eq!(error.code(), ErrorCode::BookUnavailable);
}

#[tokio::test]
async fn pick_up_requires_an_identity_after_the_book_checks() {
    let book_id = BookId::new();
    let books = books_returning(Some(shelved_book(book_id, true)));
    let mut loans = MockLoanRepository::new();
    loans.expect_find_open_by_book_and_user().times(0);
    loans.expect_checkout().times(0);

    let error = service(books, loans)
        .pick_up(PickUpRequest {
            book_id,
            requesting_user: None,
        })
        .await
        .expect_err("anonymous");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "No logged in user");
}

#[tokio::test]
async fn pick_up_rejects_a_user_already_holding_the_book() {
    let book_id = BookId::new();
    let user_id = UserId::new();
    // Stale availability: the flag says available while an open loan exists.
    let books = books_returning(Some(shelved_book(book_id, true)));
    let mut loans = MockLoanRepository::new();
    loans
        .expect_find_open_by_book_and_user()
        .times(1)
        .return_once(move |_, _| Ok(Some(Loan::open(book_id, user_id, Utc::now()))));
    loans.expect_checkout().times(0);

    let error = service(books, loans)
        .pick_up(PickUpRequest {
            book_id,
            requesting_user: Some(user_id),
        })
        .await
        .expect_err("already held");

    assert_eq!(error.code(), ErrorCode::AlreadyPicked);
}

#[tokio::test]
async fn pick_up_maps_a_lost_race_to_book_unavailable() {
    let book_id = BookId::new();
    let books = books_returning(Some(shelved_book(book_id, true)));
    let mut loans = MockLoanRepository::new();
    loans
        .expect_find_open_by_book_and_user()
        .times(1)
        .return_once(|_, _| Ok(None));
    // A concurrent pick-up committed between the read and the transaction.
    loans
        .expect_checkout()
        .times(1)
        .return_once(|_, _, _| Err(LoanRepositoryError::BookUnavailable));

    let error = service(books, loans)
        .pick_up(PickUpRequest {
            book_id,
            requesting_user: Some(UserId::new()),
        })
        .await
        .expect_err("raced");

    assert_eq!(error.code(), ErrorCode::BookUnavailable);
}

#[tokio::test]
async fn pick_up_retries_conflicted_transactions_then_succeeds() {
    let book_id = BookId::new();
    let loan_id = LoanId::new();
    let books = books_returning(Some(shelved_book(book_id, true)));
    let mut loans = MockLoanRepository::new();
    loans
        .expect_find_open_by_book_and_user()
        .times(1)
        .return_once(|_, _| Ok(None));
    let mut attempts = 0_u32;
    loans.expect_checkout().times(3).returning(move |_, _, _| {
        attempts += 1;
        if attempts < 3 {
            Err(LoanRepositoryError::serialization("could not serialize access"))
        } else {
            Ok(loan_id)
        }
    });

    let response = service(books, loans)
        .pick_up(PickUpRequest {
            book_id,
            requesting_user: Some(UserId::new()),
        })
        .await
        .expect("third attempt succeeds");

    assert_eq!(response.loan_id, loan_id);
}

#[tokio::test]
async fn pick_up_gives_up_after_bounded_conflict_retries() {
    let book_id = BookId::new();
    let books = books_returning(Some(shelved_book(book_id, true)));
    let mut loans = MockLoanRepository::new();
    loans
        .expect_find_open_by_book_and_user()
        .times(1)
        .return_once(|_, _| Ok(None));
    loans
        .expect_checkout()
        .times(3)
        .returning(|_, _, _| Err(LoanRepositoryError::serialization("still conflicted")));

    let error = service(books, loans)
        .pick_up(PickUpRequest {
            book_id,
            requesting_user: Some(UserId::new()),
        })
        .await
        .expect_err("retries exhausted");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn drop_off_closes_the_open_loan() {
    let book_id = BookId::new();
    let user_id = UserId::new();
    let books = books_returning(Some(shelved_book(book_id, false)));
    let mut loans = MockLoanRepository::new();
    loans
        .expect_find_open_by_book_and_user()
        .with(eq(book_id), eq(user_id))
        .times(1)
        .return_once(move |_, _| Ok(Some(Loan::open(book_id, user_id, Utc::now()))));
    loans
        .expect_give_back()
        .with(eq(book_id), eq(user_id), mockall::predicate::always())
        .times(1)
        .return_once(|_, _, _| Ok(()));

    service(books, loans)
        .drop_off(DropOffRequest {
            book_id,
            requesting_user: Some(user_id),
        })
        .await
        .expect("drop off succeeds");
}

#[tokio::test]
async fn drop_off_rejects_users_without_an_open_loan() {
    let book_id = BookId::new();
    let books = books_returning(Some(shelved_book(book_id, false)));
    let mut loans = MockLoanRepository::new();
    // Someone else holds the book; this user never picked it up.
    loans
        .expect_find_open_by_book_and_user()
        .times(1)
        .return_once(|_, _| Ok(None));
    loans.expect_give_back().times(0);

    let error = service(books, loans)
        .drop_off(DropOffRequest {
            book_id,
            requesting_user: Some(UserId::new()),
        })
        .await
        .expect_err("no active loan");

    assert_eq!(error.code(), ErrorCode::NoActiveLoan);
    assert_eq!(error.message(), "You have not picked up this book");
}

#[tokio::test]
async fn drop_off_requires_an_identity() {
    let book_id = BookId::new();
    let books = books_returning(Some(shelved_book(book_id, false)));
    let mut loans = MockLoanRepository::new();
    loans.expect_find_open_by_book_and_user().times(0);
    loans.expect_give_back().times(0);

    let error = service(books, loans)
        .drop_off(DropOffRequest {
            book_id,
            requesting_user: None,
        })
        .await
        .expect_err("anonymous");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn drop_off_reports_unknown_books_first() {
    let books = books_returning(None);
    let loans = MockLoanRepository::new();

    let error = service(books, loans)
        .drop_off(DropOffRequest {
            book_id: BookId::new(),
            requesting_user: None,
        })
        .await
        .expect_err("unknown book");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn current_loans_returns_only_open_payloads() {
    let user_id = UserId::new();
    let open = Loan::open(BookId::new(), user_id, Utc::now());
    let expected_id = open.id();

    let mut loans = MockLoanRepository::new();
    loans
        .expect_list_open_for_user()
        .with(eq(user_id))
        .times(1)
        .return_once(move |_| Ok(vec![open]));

    let response = LendingQueryService::new(Arc::new(loans))
        .current_loans(user_id)
        .await
        .expect("list succeeds");

    assert_eq!(response.loans.len(), 1);
    assert_eq!(response.loans[0].id, expected_id);
    assert!(!response.loans[0].dropped_off);
}

#[tokio::test]
async fn loan_history_includes_closed_loans() {
    let user_id = UserId::new();
    let open = Loan::open(BookId::new(), user_id, Utc::now());
    let mut closed = Loan::open(BookId::new(), user_id, Utc::now() - Duration::days(7));
    closed
        .close(Utc::now() - Duration::days(1))
        .expect("close historical loan");

    let mut loans = MockLoanRepository::new();
    loans
        .expect_list_all_for_user()
        .times(1)
        .return_once(move |_| Ok(vec![open, closed]));

    let response = LendingQueryService::new(Arc::new(loans))
        .loan_history(user_id)
        .await
        .expect("history succeeds");

    assert_eq!(response.loans.len(), 2);
    assert!(response.loans.iter().any(|loan| loan.dropped_off));
}

#[tokio::test]
async fn connection_failures_surface_as_service_unavailable() {
    let mut loans = MockLoanRepository::new();
    loans
        .expect_list_open_for_user()
        .times(1)
        .return_once(|_| Err(LoanRepositoryError::connection("pool exhausted")));

    let error = LendingQueryService::new(Arc::new(loans))
        .current_loans(UserId::new())
        .await
        .expect_err("store down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
