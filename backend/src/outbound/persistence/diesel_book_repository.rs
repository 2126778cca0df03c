//! PostgreSQL-backed `BookRepository` implementation using Diesel.
//!
//! Availability is read here but only ever written by
//! [`DieselLoanRepository`](super::DieselLoanRepository) inside the lending
//! transactions.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BookRepository, BookRepositoryError};
use crate::domain::{Book, BookId, CategoryId};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BookRow, NewBookRow};
use super::pool::{DbPool, PoolError};
use super::schema::books;

/// Diesel-backed implementation of the book repository port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookRepositoryError {
    map_basic_pool_error(error, BookRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookRepositoryError {
    map_basic_diesel_error(
        error,
        BookRepositoryError::query,
        BookRepositoryError::connection,
    )
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn create(&self, book: &Book) -> Result<(), BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBookRow {
            id: *book.id.as_uuid(),
            name: book.name.as_str(),
            author: book.author.as_str(),
            category_id: *book.category_id.as_uuid(),
            available: book.available,
            created_at: Utc::now(),
        };
        diesel::insert_into(books::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = books::table
            .find(book_id.as_uuid())
            .select(BookRow::as_select())
            .first::<BookRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Book::from))
    }

    async fn list(&self) -> Result<Vec<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BookRow> = books::table
            .order(books::name.asc())
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_first_in_category(
        &self,
        name: String,
        category_id: CategoryId,
        author: Option<String>,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // First match wins; the catalogue does not enforce name uniqueness.
        let mut query = books::table
            .filter(books::name.eq(name))
            .filter(books::category_id.eq(*category_id.as_uuid()))
            .into_boxed();
        if let Some(author) = author {
            query = query.filter(books::author.eq(author));
        }

        let row = query
            .select(BookRow::as_select())
            .first::<BookRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Book::from))
    }
}
