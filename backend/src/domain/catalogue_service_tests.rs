//! Tests for the catalogue services.

use std::sync::Arc;

use mockall::predicate::eq;

use super::*;
use crate::domain::ports::{MockBookRepository, MockCategoryRepository};
use crate::domain::{CategoryId, ErrorCode};

fn service(
    categories: MockCategoryRepository,
    books: MockBookRepository,
) -> CatalogueService<MockCategoryRepository, MockBookRepository> {
    CatalogueService::new(Arc::new(categories), Arc::new(books))
}

#[tokio::test]
async fn create_category_persists_and_echoes_the_entity() {
    let mut categories = MockCategoryRepository::new();
    categories.expect_create().times(1).return_once(|_| Ok(()));

    let category = service(categories, MockBookRepository::new())
        .create_category(CreateCategoryRequest {
            name: "Sci-Fi".to_owned(),
        })
        .await
        .expect("create succeeds");

    assert_eq!(category.name, "Sci-Fi");
}

#[tokio::test]
async fn create_book_rejects_unknown_categories() {
    let category_id = CategoryId::new();
    let mut categories = MockCategoryRepository::new();
    categories
        .expect_find_by_id()
        .with(eq(category_id))
        .times(1)
        .return_once(|_| Ok(None));
    let mut books = MockBookRepository::new();
    books.expect_create().times(0);

    let error = service(categories, books)
        .create_book(CreateBookRequest {
            name: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            category_id,
        })
        .await
        .expect_err("unknown category");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "No category provided id");
}

#[tokio::test]
async fn create_book_starts_available() {
    let category_id = CategoryId::new();
    let mut categories = MockCategoryRepository::new();
    categories
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(Category::new("Sci-Fi"))));
    let mut books = MockBookRepository::new();
    books.expect_create().times(1).return_once(|_| Ok(()));

    let book = service(categories, books)
        .create_book(CreateBookRequest {
            name: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            category_id,
        })
        .await
        .expect("create succeeds");

    assert!(book.available);
    assert_eq!(book.category_id, category_id);
}

#[tokio::test]
async fn find_book_rejects_unknown_categories() {
    let mut categories = MockCategoryRepository::new();
    categories
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));

    let error = service(categories, MockBookRepository::new())
        .find_book(FindBookRequest {
            name: "Dune".to_owned(),
            category_id: CategoryId::new(),
            author: None,
        })
        .await
        .expect_err("unknown category");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "No such book category");
}

#[tokio::test]
async fn find_book_returns_none_for_no_match() {
    let category_id = CategoryId::new();
    let mut categories = MockCategoryRepository::new();
    categories
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(Category::new("Sci-Fi"))));
    let mut books = MockBookRepository::new();
    books
        .expect_find_first_in_category()
        .withf(|name, _, author| name == "Dune" && author.is_none())
        .times(1)
        .return_once(|_, _, _| Ok(None));

    let found = service(categories, books)
        .find_book(FindBookRequest {
            name: "Dune".to_owned(),
            category_id,
            author: None,
        })
        .await
        .expect("search succeeds");

    assert!(found.is_none());
}

#[tokio::test]
async fn find_book_passes_the_author_filter_through() {
    let category_id = CategoryId::new();
    let mut categories = MockCategoryRepository::new();
    categories
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(Category::new("Sci-Fi"))));
    let mut books = MockBookRepository::new();
    let book = Book::new("Dune", "Frank Herbert", category_id);
    let expected_id = book.id;
    books
        .expect_find_first_in_category()
        .withf(|name, _, author| name == "Dune" && author.as_deref() == Some("Frank Herbert"))
        .times(1)
        .return_once(move |_, _, _| Ok(Some(book)));

    let found = service(categories, books)
        .find_book(FindBookRequest {
            name: "Dune".to_owned(),
            category_id,
            author: Some("Frank Herbert".to_owned()),
        })
        .await
        .expect("search succeeds")
        .expect("book found");

    assert_eq!(found.id, expected_id);
}
