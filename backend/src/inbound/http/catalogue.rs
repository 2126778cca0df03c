//! Catalogue API handlers.
//!
//! ```text
//! GET  /categories
//! POST /create/category {"name":"Sci-Fi"}
//! GET  /books
//! POST /create/book {"name":"Dune","author":"Frank Herbert","categoryId":"..."}
//! GET  /search/{name}/{categoryId}
//! GET  /search/{name}/{categoryId}/{author}
//! ```
//!
//! Catalogue routes are unauthenticated; only the lending routes require a
//! session. Search answers `200` with a JSON `null` body when no book
//! matches, and `404` when the category itself is unknown.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{CreateBookRequest, CreateCategoryRequest, FindBookRequest};
use crate::domain::{Book, Category, CategoryId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Category as exposed over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBody {
    /// Category identifier.
    pub id: CategoryId,
    /// Display name.
    #[schema(example = "Sci-Fi")]
    pub name: String,
}

impl From<Category> for CategoryBody {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// Book as exposed over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookBody {
    /// Book identifier.
    pub id: crate::domain::BookId,
    /// Title as shelved.
    #[schema(example = "Dune")]
    pub name: String,
    /// Author as shelved.
    #[schema(example = "Frank Herbert")]
    pub author: String,
    /// Owning category.
    pub category_id: CategoryId,
    /// Whether the book can currently be picked up.
    pub available: bool,
}

impl From<Book> for BookBody {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            name: book.name,
            author: book.author,
            category_id: book.category_id,
            available: book.available,
        }
    }
}

/// Request body for `POST /create/category`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryBody {
    /// Display name; must not be blank.
    #[schema(example = "Sci-Fi")]
    pub name: String,
}

/// Request body for `POST /create/book`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookBody {
    /// Title; must not be blank.
    #[schema(example = "Dune")]
    pub name: String,
    /// Author; must not be blank.
    #[schema(example = "Frank Herbert")]
    pub author: String,
    /// Category the book belongs to; must exist.
    pub category_id: CategoryId,
}

fn require_non_blank(value: &str, field: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(
            Error::invalid_request(format!("{field} must not be empty"))
                .with_details(json!({ "field": field })),
        );
    }
    Ok(())
}

/// List all categories.
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Categories", body = [CategoryBody]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listCategories",
    security([])
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CategoryBody>>> {
    let categories = state.catalogue_query.list_categories().await?;
    Ok(web::Json(
        categories.into_iter().map(CategoryBody::from).collect(),
    ))
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/create/category",
    request_body = CreateCategoryBody,
    responses(
        (status = 200, description = "Created category", body = CategoryBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "createCategory",
    security([])
)]
#[post("/create/category")]
pub async fn create_category(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCategoryBody>,
) -> ApiResult<web::Json<CategoryBody>> {
    let payload = payload.into_inner();
    require_non_blank(&payload.name, "name")?;
    let category = state
        .catalogue
        .create_category(CreateCategoryRequest { name: payload.name })
        .await?;
    Ok(web::Json(category.into()))
}

/// List the whole catalogue.
#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "Books", body = [BookBody]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listBooks",
    security([])
)]
#[get("/books")]
pub async fn list_books(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<BookBody>>> {
    let books = state.catalogue_query.list_books().await?;
    Ok(web::Json(books.into_iter().map(BookBody::from).collect()))
}

/// Create a book inside an existing category.
#[utoipa::path(
    post,
    path = "/create/book",
    request_body = CreateBookBody,
    responses(
        (status = 200, description = "Created book", body = BookBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown category", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "createBook",
    security([])
)]
#[post("/create/book")]
pub async fn create_book(
    state: web::Data<HttpState>,
    payload: web::Json<CreateBookBody>,
) -> ApiResult<web::Json<BookBody>> {
    let payload = payload.into_inner();
    require_non_blank(&payload.name, "name")?;
    require_non_blank(&payload.author, "author")?;
    let book = state
        .catalogue
        .create_book(CreateBookRequest {
            name: payload.name,
            author: payload.author,
            category_id: payload.category_id,
        })
        .await?;
    Ok(web::Json(book.into()))
}

/// Find the first book with the given title in a category.
#[utoipa::path(
    get,
    path = "/search/{name}/{categoryId}",
    params(
        ("name" = String, Path, description = "Exact title to match"),
        ("categoryId" = uuid::Uuid, Path, description = "Category to search in")
    ),
    responses(
        (status = 200, description = "First match, or null", body = Option<BookBody>),
        (status = 404, description = "Unknown category", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "findBook",
    security([])
)]
#[get("/search/{name}/{category_id}")]
pub async fn find_book(
    state: web::Data<HttpState>,
    path: web::Path<(String, CategoryId)>,
) -> ApiResult<web::Json<Option<BookBody>>> {
    let (name, category_id) = path.into_inner();
    let book = state
        .catalogue_query
        .find_book(FindBookRequest {
            name,
            category_id,
            author: None,
        })
        .await?;
    Ok(web::Json(book.map(BookBody::from)))
}

/// Find the first book with the given title and author in a category.
#[utoipa::path(
    get,
    path = "/search/{name}/{categoryId}/{author}",
    params(
        ("name" = String, Path, description = "Exact title to match"),
        ("categoryId" = uuid::Uuid, Path, description = "Category to search in"),
        ("author" = String, Path, description = "Exact author to match")
    ),
    responses(
        (status = 200, description = "First match, or null", body = Option<BookBody>),
        (status = 404, description = "Unknown category", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "findBookByAuthor",
    security([])
)]
#[get("/search/{name}/{category_id}/{author}")]
pub async fn find_book_by_author(
    state: web::Data<HttpState>,
    path: web::Path<(String, CategoryId, String)>,
) -> ApiResult<web::Json<Option<BookBody>>> {
    let (name, category_id, author) = path.into_inner();
    let book = state
        .catalogue_query
        .find_book(FindBookRequest {
            name,
            category_id,
            author: Some(author),
        })
        .await?;
    Ok(web::Json(book.map(BookBody::from)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::Value;
    use std::sync::Arc;

    use crate::domain::ports::{MockCatalogueCommand, MockCatalogueQuery};

    use super::*;

    fn app_with_state(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .service(list_categories)
            .service(create_category)
            .service(list_books)
            .service(create_book)
            .service(find_book)
            .service(find_book_by_author)
    }

    #[actix_web::test]
    async fn created_category_is_echoed_back() {
        let mut catalogue = MockCatalogueCommand::new();
        catalogue
            .expect_create_category()
            .withf(|request| request.name == "Sci-Fi")
            .returning(|request| Ok(Category::new(request.name)));
        let state = HttpState {
            catalogue: Arc::new(catalogue),
            ..HttpState::default()
        };

        let app = test::init_service(app_with_state(state)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/create/category")
                .set_json(CreateCategoryBody {
                    name: "Sci-Fi".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&test::read_body(response).await).expect("category body");
        assert_eq!(body["name"], "Sci-Fi");
        assert!(body["id"].is_string());
    }

    #[actix_web::test]
    async fn blank_category_name_is_rejected() {
        let app = test::init_service(app_with_state(HttpState::default())).await;
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/create/category")
                .set_json(CreateCategoryBody { name: "  ".into() })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn creating_a_book_in_an_unknown_category_is_not_found() {
        let mut catalogue = MockCatalogueCommand::new();
        catalogue
            .expect_create_book()
            .returning(|_| Err(Error::not_found("No category provided id")));
        let state = HttpState {
            catalogue: Arc::new(catalogue),
            ..HttpState::default()
        };

        let app = test::init_service(app_with_state(state)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/create/book")
                .set_json(CreateBookBody {
                    name: "Dune".into(),
                    author: "Frank Herbert".into(),
                    category_id: CategoryId::new(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value =
            serde_json::from_slice(&test::read_body(response).await).expect("error body");
        assert_eq!(body["message"], "No category provided id");
    }

    #[actix_web::test]
    async fn search_returns_null_when_nothing_matches() {
        let mut query = MockCatalogueQuery::new();
        query.expect_find_book().returning(|_| Ok(None));
        let state = HttpState {
            catalogue_query: Arc::new(query),
            ..HttpState::default()
        };

        let app = test::init_service(app_with_state(state)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/search/Dune/{}", CategoryId::new()))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = test::read_body(response).await;
        assert_eq!(body, "null");
    }

    #[actix_web::test]
    async fn author_segment_narrows_the_search() {
        let category_id = CategoryId::new();
        let mut query = MockCatalogueQuery::new();
        query
            .expect_find_book()
            .withf(|request| request.author.as_deref() == Some("Frank Herbert"))
            .returning(|request| {
                Ok(Some(Book::new(
                    request.name,
                    request.author.unwrap_or_default(),
                    request.category_id,
                )))
            });
        let state = HttpState {
            catalogue_query: Arc::new(query),
            ..HttpState::default()
        };

        let app = test::init_service(app_with_state(state)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/search/Dune/{category_id}/Frank%20Herbert"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&test::read_body(response).await).expect("book body");
        assert_eq!(body["author"], "Frank Herbert");
        assert_eq!(body["available"], true);
    }

    #[actix_web::test]
    async fn malformed_category_id_is_a_client_error() {
        let app = test::init_service(app_with_state(HttpState::default())).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/search/Dune/999")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
