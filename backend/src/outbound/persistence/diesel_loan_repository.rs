//! PostgreSQL-backed `LoanRepository` implementation using Diesel.
//!
//! The two lending transitions each run as a single transaction: the book
//! row is locked with `SELECT ... FOR UPDATE`, the preconditions are
//! re-checked under the lock, and the loan and availability writes commit
//! together. A lost lock or serialization conflict surfaces as
//! [`LoanRepositoryError::Serialization`] so the coordinator can retry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{LoanRepository, LoanRepositoryError};
use crate::domain::{BookId, Loan, LoanId, UserId};

use super::error_mapping::map_basic_pool_error;
use super::models::{LoanRow, NewLoanRow};
use super::pool::{DbPool, PoolError};
use super::schema::{books, loans};

/// Diesel-backed implementation of the loan repository port.
#[derive(Clone)]
pub struct DieselLoanRepository {
    pool: DbPool,
}

impl DieselLoanRepository {
    /// Create a repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Transaction-internal error carrying either a domain outcome or a Diesel
/// failure; the `From` impl lets `?` propagate Diesel errors and roll the
/// transaction back.
#[derive(Debug)]
enum TxError {
    Outcome(LoanRepositoryError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<TxError> for LoanRepositoryError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Outcome(outcome) => outcome,
            TxError::Diesel(diesel) => map_transaction_error(diesel),
        }
    }
}

fn map_pool_error(error: PoolError) -> LoanRepositoryError {
    map_basic_pool_error(error, LoanRepositoryError::connection)
}

fn map_transaction_error(error: diesel::result::Error) -> LoanRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, info) => {
            LoanRepositoryError::serialization(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            LoanRepositoryError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            LoanRepositoryError::query(info.message().to_owned())
        }
        other => LoanRepositoryError::query(other.to_string()),
    }
}

fn into_loan(row: LoanRow) -> Result<Loan, LoanRepositoryError> {
    Loan::try_from(row)
        .map_err(|error| LoanRepositoryError::query(format!("stored loan rejected: {error}")))
}

#[async_trait]
impl LoanRepository for DieselLoanRepository {
    async fn checkout(
        &self,
        book_id: BookId,
        user_id: UserId,
        picked_at: DateTime<Utc>,
    ) -> Result<LoanId, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let loan_id = LoanId::new();

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                // Lock the book row so concurrent checkouts serialize here.
                let available: Option<bool> = books::table
                    .find(book_id.as_uuid())
                    .select(books::available)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let available = available
                    .ok_or(TxError::Outcome(LoanRepositoryError::BookMissing))?;

                let held: i64 = loans::table
                    .filter(loans::book_id.eq(*book_id.as_uuid()))
                    .filter(loans::user_id.eq(*user_id.as_uuid()))
                    .filter(loans::dropped_off.eq(false))
                    .count()
                    .get_result(conn)
                    .await?;
                if held > 0 {
                    return Err(TxError::Outcome(LoanRepositoryError::AlreadyPicked));
                }
                if !available {
                    return Err(TxError::Outcome(LoanRepositoryError::BookUnavailable));
                }

                diesel::insert_into(loans::table)
                    .values(&NewLoanRow {
                        id: *loan_id.as_uuid(),
                        book_id: *book_id.as_uuid(),
                        user_id: *user_id.as_uuid(),
                        picked_at,
                        dropped_off: false,
                        dropped_at: None,
                    })
                    .execute(conn)
                    .await?;
                diesel::update(books::table.find(book_id.as_uuid()))
                    .set(books::available.eq(false))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(LoanRepositoryError::from)?;

        Ok(loan_id)
    }

    async fn give_back(
        &self,
        book_id: BookId,
        user_id: UserId,
        dropped_at: DateTime<Utc>,
    ) -> Result<(), LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let exists: Option<Uuid> = books::table
                    .find(book_id.as_uuid())
                    .select(books::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if exists.is_none() {
                    return Err(TxError::Outcome(LoanRepositoryError::BookMissing));
                }

                let open_loan: Option<Uuid> = loans::table
                    .filter(loans::book_id.eq(*book_id.as_uuid()))
                    .filter(loans::user_id.eq(*user_id.as_uuid()))
                    .filter(loans::dropped_off.eq(false))
                    .select(loans::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let open_loan =
                    open_loan.ok_or(TxError::Outcome(LoanRepositoryError::NoActiveLoan))?;

                diesel::update(loans::table.find(open_loan))
                    .set((
                        loans::dropped_off.eq(true),
                        loans::dropped_at.eq(Some(dropped_at)),
                    ))
                    .execute(conn)
                    .await?;
                diesel::update(books::table.find(book_id.as_uuid()))
                    .set(books::available.eq(true))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(LoanRepositoryError::from)
    }

    async fn find_open_by_book_and_user(
        &self,
        book_id: BookId,
        user_id: UserId,
    ) -> Result<Option<Loan>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = loans::table
            .filter(loans::book_id.eq(*book_id.as_uuid()))
            .filter(loans::user_id.eq(*user_id.as_uuid()))
            .filter(loans::dropped_off.eq(false))
            .select(LoanRow::as_select())
            .first::<LoanRow>(&mut conn)
            .await
            .optional()
            .map_err(map_transaction_error)?;
        row.map(into_loan).transpose()
    }

    async fn list_open_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Loan>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LoanRow> = loans::table
            .filter(loans::user_id.eq(*user_id.as_uuid()))
            .filter(loans::dropped_off.eq(false))
            .order(loans::picked_at.asc())
            .select(LoanRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_transaction_error)?;
        rows.into_iter().map(into_loan).collect()
    }

    async fn list_all_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Loan>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LoanRow> = loans::table
            .filter(loans::user_id.eq(*user_id.as_uuid()))
            .order(loans::picked_at.asc())
            .select(LoanRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_transaction_error)?;
        rows.into_iter().map(into_loan).collect()
    }
}
