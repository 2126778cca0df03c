//! Builders for HTTP state ports and repository-backed service pairs.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    CatalogueCommand, CatalogueQuery, FixtureCatalogueCommand, FixtureCatalogueQuery,
    FixtureLendingCommand, FixtureLendingQuery, FixtureUserRepository, LendingCommand,
    LendingQuery, UserRepository,
};
use crate::domain::{CatalogueService, LendingQueryService, LendingService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DieselBookRepository, DieselCategoryRepository, DieselLoanRepository, DieselUserRepository,
};

use super::ServerConfig;

fn build_lending_pair(config: &ServerConfig) -> (Arc<dyn LendingCommand>, Arc<dyn LendingQuery>) {
    match &config.db_pool {
        Some(pool) => {
            let books = Arc::new(DieselBookRepository::new(pool.clone()));
            let loans = Arc::new(DieselLoanRepository::new(pool.clone()));
            (
                Arc::new(LendingService::new(books, Arc::clone(&loans))),
                Arc::new(LendingQueryService::new(loans)),
            )
        }
        None => (
            Arc::new(FixtureLendingCommand),
            Arc::new(FixtureLendingQuery),
        ),
    }
}

fn build_catalogue_pair(
    config: &ServerConfig,
) -> (Arc<dyn CatalogueCommand>, Arc<dyn CatalogueQuery>) {
    match &config.db_pool {
        Some(pool) => {
            let categories = Arc::new(DieselCategoryRepository::new(pool.clone()));
            let books = Arc::new(DieselBookRepository::new(pool.clone()));
            let service = Arc::new(CatalogueService::new(categories, books));
            (
                Arc::clone(&service) as Arc<dyn CatalogueCommand>,
                service as Arc<dyn CatalogueQuery>,
            )
        }
        None => (
            Arc::new(FixtureCatalogueCommand),
            Arc::new(FixtureCatalogueQuery),
        ),
    }
}

fn build_users_port(config: &ServerConfig) -> Arc<dyn UserRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselUserRepository::new(pool.clone())),
        None => Arc::new(FixtureUserRepository),
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let (lending, lending_query) = build_lending_pair(config);
    let (catalogue, catalogue_query) = build_catalogue_pair(config);
    let users = build_users_port(config);

    web::Data::new(HttpState {
        lending,
        lending_query,
        catalogue,
        catalogue_query,
        users,
    })
}

#[cfg(test)]
mod tests {
    use actix_web::cookie::{Key, SameSite};

    use crate::domain::ports::{DropOffRequest, PickUpRequest};
    use crate::domain::{BookId, ErrorCode, UserId};

    use super::*;

    fn fixture_config() -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("loopback address"),
        )
    }

    #[tokio::test]
    async fn pool_absent_keeps_fixture_ports() {
        let state = build_http_state(&fixture_config());

        let books = state
            .catalogue_query
            .list_books()
            .await
            .expect("fixture catalogue lists");
        assert!(books.is_empty());

        let denied = state
            .lending
            .pick_up(PickUpRequest {
                book_id: BookId::new(),
                requesting_user: Some(UserId::new()),
            })
            .await
            .expect_err("empty library has no books");
        assert_eq!(denied.code(), ErrorCode::NotFound);

        let denied = state
            .lending
            .drop_off(DropOffRequest {
                book_id: BookId::new(),
                requesting_user: Some(UserId::new()),
            })
            .await
            .expect_err("empty library has no loans");
        assert_eq!(denied.code(), ErrorCode::NotFound);
    }
}
