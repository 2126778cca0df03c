//! Library domain: entities, the lending coordinator, and ports.
//!
//! The only nontrivial behaviour lives in [`LendingService`]; everything
//! else is typed plumbing around it. Entities are transport agnostic —
//! inbound adapters own the JSON shapes, outbound adapters own the rows.

pub mod book;
pub mod category;
pub mod catalogue_service;
pub mod error;
pub mod id;
pub mod lending_service;
pub mod loan;
pub mod ports;
pub mod user;

pub use self::book::Book;
pub use self::catalogue_service::CatalogueService;
pub use self::category::Category;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::id::{BookId, CategoryId, LoanId, UserId};
pub use self::lending_service::{LendingQueryService, LendingService};
pub use self::loan::{Loan, LoanRecord, LoanStateError};
pub use self::user::{EmailAddress, EmailValidationError, User};
