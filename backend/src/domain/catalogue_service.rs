//! Catalogue services: pass-through CRUD plus the category-existence checks.
//!
//! The only policy here is "the category must exist" on book creation and
//! search; everything else stores or returns what was sent.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{
    BookRepository, BookRepositoryError, CatalogueCommand, CatalogueQuery, CategoryRepository,
    CategoryRepositoryError, CreateBookRequest, CreateCategoryRequest, FindBookRequest,
};
use crate::domain::{Book, Category};

const NO_CATEGORY_MESSAGE: &str = "No category provided id";
const NO_SUCH_CATEGORY_MESSAGE: &str = "No such book category";

fn map_category_repository_error(error: CategoryRepositoryError) -> Error {
    match error {
        CategoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("category store unavailable: {message}"))
        }
        CategoryRepositoryError::Query { message } => {
            Error::internal(format!("category store error: {message}"))
        }
    }
}

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

/// Catalogue service over the category and book repositories.
#[derive(Clone)]
pub struct CatalogueService<C, B> {
    categories: Arc<C>,
    books: Arc<B>,
}

impl<C, B> CatalogueService<C, B> {
    /// Create a catalogue service over the given repositories.
    pub fn new(categories: Arc<C>, books: Arc<B>) -> Self {
        Self { categories, books }
    }
}

#[async_trait]
impl<C, B> CatalogueCommand for CatalogueService<C, B>
where
    C: CategoryRepository,
    B: BookRepository,
{
    async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, Error> {
        let category = Category::new(request.name);
        self.categories
            .create(&category)
            .await
            .map_err(map_category_repository_error)?;
        info!(category_id = %category.id, "category created");
        Ok(category)
    }

    async fn create_book(&self, request: CreateBookRequest) -> Result<Book, Error> {
        let CreateBookRequest {
            name,
            author,
            category_id,
        } = request;

        self.categories
            .find_by_id(category_id)
            .await
            .map_err(map_category_repository_error)?
            .ok_or_else(|| Error::not_found(NO_CATEGORY_MESSAGE))?;

        let book = Book::new(name, author, category_id);
        self.books
            .create(&book)
            .await
            .map_err(map_book_repository_error)?;
        info!(book_id = %book.id, %category_id, "book created");
        Ok(book)
    }
}

#[async_trait]
impl<C, B> CatalogueQuery for CatalogueService<C, B>
where
    C: CategoryRepository,
    B: BookRepository,
{
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.categories
            .list()
            .await
            .map_err(map_category_repository_error)
    }

    async fn list_books(&self) -> Result<Vec<Book>, Error> {
        self.books.list().await.map_err(map_book_repository_error)
    }

    async fn find_book(&self, request: FindBookRequest) -> Result<Option<Book>, Error> {
        let FindBookRequest {
            name,
            category_id,
            author,
        } = request;

        self.categories
            .find_by_id(category_id)
            .await
            .map_err(map_category_repository_error)?
            .ok_or_else(|| Error::not_found(NO_SUCH_CATEGORY_MESSAGE))?;

        self.books
            .find_first_in_category(name, category_id, author)
            .await
            .map_err(map_book_repository_error)
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
