//! Port for category persistence.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId};

/// Errors raised by category repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryRepositoryError {
    /// Repository connection could not be established.
    #[error("category repository connection failed: {message}")]
    Connection {
        /// Adapter-provided diagnostic.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("category repository query failed: {message}")]
    Query {
        /// Adapter-provided diagnostic.
        message: String,
    },
}

impl CategoryRepositoryError {
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

/// Port for reading and creating book categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Persist a new category.
    async fn create(&self, category: &Category) -> Result<(), CategoryRepositoryError>;

    /// Find a category by id.
    async fn find_by_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError>;

    /// List all categories.
    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError>;
}

/// Fixture implementation with no stored categories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryRepository;

#[async_trait]
impl CategoryRepository for FixtureCategoryRepository {
    async fn create(&self, _category: &Category) -> Result<(), CategoryRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _category_id: CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        Ok(Vec::new())
    }
}
