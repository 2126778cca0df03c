//! Driving ports for catalogue pass-through operations.
//!
//! These operations carry no policy beyond "store what was sent" plus the
//! category-existence check on book creation and search.

use async_trait::async_trait;

use crate::domain::{Book, Category, CategoryId, Error};

/// Request to create a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryRequest {
    /// Display name.
    pub name: String,
}

/// Request to create a catalogue book.
#[derive(Debug, Clone)]
pub struct CreateBookRequest {
    /// Title as shelved.
    pub name: String,
    /// Author as shelved.
    pub author: String,
    /// Category the book belongs to; must exist.
    pub category_id: CategoryId,
}

/// Request to find the first matching book within a category.
#[derive(Debug, Clone)]
pub struct FindBookRequest {
    /// Title to match exactly.
    pub name: String,
    /// Category to search in; must exist.
    pub category_id: CategoryId,
    /// Optional author to narrow the match.
    pub author: Option<String>,
}

/// Command port: catalogue entry creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Create a category and return it.
    async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, Error>;

    /// Create a book and return it. Fails `NotFound` when the category id
    /// is unknown.
    async fn create_book(&self, request: CreateBookRequest) -> Result<Book, Error>;
}

/// Query port: catalogue listings and search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// List all categories.
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;

    /// List the whole catalogue.
    async fn list_books(&self) -> Result<Vec<Book>, Error>;

    /// First book matching the request, or `None`. Fails `NotFound` when the
    /// category id is unknown.
    async fn find_book(&self, request: FindBookRequest) -> Result<Option<Book>, Error>;
}

/// Fixture command port echoing created entities without storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueCommand;

#[async_trait]
impl CatalogueCommand for FixtureCatalogueCommand {
    async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, Error> {
        Ok(Category::new(request.name))
    }

    async fn create_book(&self, _request: CreateBookRequest) -> Result<Book, Error> {
        Err(Error::not_found("No category provided id"))
    }
}

/// Fixture query port backing an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueQuery;

#[async_trait]
impl CatalogueQuery for FixtureCatalogueQuery {
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        Ok(Vec::new())
    }

    async fn list_books(&self) -> Result<Vec<Book>, Error> {
        Ok(Vec::new())
    }

    async fn find_book(&self, _request: FindBookRequest) -> Result<Option<Book>, Error> {
        Err(Error::not_found("No such book category"))
    }
}
