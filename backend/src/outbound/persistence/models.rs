//! Diesel row models and their conversions to domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Book, BookId, Category, CategoryId, EmailAddress, EmailValidationError, Loan, LoanId,
    LoanRecord, LoanStateError, User, UserId,
};

use super::schema::{books, categories, loans, users};

/// Queryable row for categories.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: Uuid,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::from_uuid(row.id),
            name: row.name,
        }
    }
}

/// Insertable row for categories.
#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Queryable row for books.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: Uuid,
    pub name: String,
    pub author: String,
    pub category_id: Uuid,
    pub available: bool,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: BookId::from_uuid(row.id),
            name: row.name,
            author: row.author,
            category_id: CategoryId::from_uuid(row.category_id),
            available: row.available,
        }
    }
}

/// Insertable row for books.
#[derive(Debug, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub author: &'a str,
    pub category_id: Uuid,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// Queryable row for users.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
}

impl TryFrom<UserRow> for User {
    type Error = EmailValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: EmailAddress::new(row.email)?,
        })
    }
}

/// Queryable row for loans.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoanRow {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub picked_at: DateTime<Utc>,
    pub dropped_off: bool,
    pub dropped_at: Option<DateTime<Utc>>,
}

impl TryFrom<LoanRow> for Loan {
    type Error = LoanStateError;

    fn try_from(row: LoanRow) -> Result<Self, Self::Error> {
        Loan::from_record(LoanRecord {
            id: LoanId::from_uuid(row.id),
            book_id: BookId::from_uuid(row.book_id),
            user_id: UserId::from_uuid(row.user_id),
            picked_at: row.picked_at,
            dropped_off: row.dropped_off,
            dropped_at: row.dropped_at,
        })
    }
}

/// Insertable row for loans; new loans are always open.
#[derive(Debug, Insertable)]
#[diesel(table_name = loans)]
pub(crate) struct NewLoanRow {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub picked_at: DateTime<Utc>,
    pub dropped_off: bool,
    pub dropped_at: Option<DateTime<Utc>>,
}
