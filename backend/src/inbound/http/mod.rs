//! HTTP inbound adapter exposing the REST endpoints.

pub mod catalogue;
pub mod error;
pub mod health;
pub mod lending;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
