//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by persistence adapters in
//! `outbound::persistence`; driving ports (`LendingCommand` and friends) are
//! implemented by the domain services and consumed by HTTP handlers. Every
//! port ships a `Fixture*` implementation for wiring without a database and,
//! under `cfg(test)`, a mockall mock.

mod book_repository;
mod catalogue;
mod category_repository;
mod lending;
mod loan_repository;
mod user_repository;

#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookRepository, BookRepositoryError, FixtureBookRepository};
#[cfg(test)]
pub use catalogue::{MockCatalogueCommand, MockCatalogueQuery};
pub use catalogue::{
    CatalogueCommand, CatalogueQuery, CreateBookRequest, CreateCategoryRequest, FindBookRequest,
    FixtureCatalogueCommand, FixtureCatalogueQuery,
};
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::{
    CategoryRepository, CategoryRepositoryError, FixtureCategoryRepository,
};
#[cfg(test)]
pub use lending::{MockLendingCommand, MockLendingQuery};
pub use lending::{
    DropOffRequest, FixtureLendingCommand, FixtureLendingQuery, LendingCommand, LendingQuery,
    LoanListResponse, LoanPayload, PickUpRequest, PickUpResponse,
};
#[cfg(test)]
pub use loan_repository::MockLoanRepository;
pub use loan_repository::{FixtureLoanRepository, LoanRepository, LoanRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
