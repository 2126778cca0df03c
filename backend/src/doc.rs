//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: all HTTP endpoints from the inbound layer, the shared
//! error schema, and the session cookie security scheme. The generated
//! specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::catalogue::{BookBody, CategoryBody, CreateBookBody, CreateCategoryBody};
use crate::inbound::http::lending::LoanBody;
use crate::inbound::http::users::LoginRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Library lending API",
        description = "Catalogue management and session-authenticated book lending."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::catalogue::list_categories,
        crate::inbound::http::catalogue::create_category,
        crate::inbound::http::catalogue::list_books,
        crate::inbound::http::catalogue::create_book,
        crate::inbound::http::catalogue::find_book,
        crate::inbound::http::catalogue::find_book_by_author,
        crate::inbound::http::lending::pick_up,
        crate::inbound::http::lending::drop_off,
        crate::inbound::http::lending::current_picks,
        crate::inbound::http::lending::loan_history,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        CategoryBody,
        BookBody,
        CreateCategoryBody,
        CreateBookBody,
        LoanBody,
    )),
    tags(
        (name = "users", description = "Login and session identity"),
        (name = "catalogue", description = "Categories, books, and search"),
        (name = "lending", description = "Pick up, drop off, and loan listings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
