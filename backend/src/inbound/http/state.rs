//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CatalogueCommand, CatalogueQuery, FixtureCatalogueCommand, FixtureCatalogueQuery,
    FixtureLendingCommand, FixtureLendingQuery, FixtureUserRepository, LendingCommand,
    LendingQuery, UserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Lending state transitions (pick up, drop off).
    pub lending: Arc<dyn LendingCommand>,
    /// Loan listings for the session user.
    pub lending_query: Arc<dyn LendingQuery>,
    /// Catalogue entry creation.
    pub catalogue: Arc<dyn CatalogueCommand>,
    /// Catalogue listings and search.
    pub catalogue_query: Arc<dyn CatalogueQuery>,
    /// Registered-user lookups for login.
    pub users: Arc<dyn UserRepository>,
}

impl Default for HttpState {
    fn default() -> Self {
        Self {
            lending: Arc::new(FixtureLendingCommand),
            lending_query: Arc::new(FixtureLendingQuery),
            catalogue: Arc::new(FixtureCatalogueCommand),
            catalogue_query: Arc::new(FixtureCatalogueQuery),
            users: Arc::new(FixtureUserRepository),
        }
    }
}
