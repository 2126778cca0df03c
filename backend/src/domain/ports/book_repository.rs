//! Port for book catalogue persistence.

use async_trait::async_trait;

use crate::domain::{Book, BookId, CategoryId};

/// Errors raised by book repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookRepositoryError {
    /// Repository connection could not be established.
    #[error("book repository connection failed: {message}")]
    Connection {
        /// Adapter-provided diagnostic.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("book repository query failed: {message}")]
    Query {
        /// Adapter-provided diagnostic.
        message: String,
    },
}

impl BookRepositoryError {
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
}

/// Port for reading and creating catalogue books.
///
/// Availability writes are deliberately absent: only the loan repository's
/// transactional pick-up/drop-off operations flip `available`, so the flag
/// can never drift from the open-loan state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Persist a new catalogue entry.
    async fn create(&self, book: &Book) -> Result<(), BookRepositoryError>;

    /// Find a book by id.
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError>;

    /// List the whole catalogue.
    async fn list(&self) -> Result<Vec<Book>, BookRepositoryError>;

    /// First book matching name (and author, when given) within a category.
    ///
    /// When several books match, an arbitrary one is returned; the catalogue
    /// does not enforce name uniqueness.
    async fn find_first_in_category(
        &self,
        name: String,
        category_id: CategoryId,
        author: Option<String>,
    ) -> Result<Option<Book>, BookRepositoryError>;
}

/// Fixture implementation backing an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookRepository;

#[async_trait]
impl BookRepository for FixtureBookRepository {
    async fn create(&self, _book: &Book) -> Result<(), BookRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_first_in_category(
        &self,
        _name: String,
        _category_id: CategoryId,
        _author: Option<String>,
    ) -> Result<Option<Book>, BookRepositoryError> {
        Ok(None)
    }
}
