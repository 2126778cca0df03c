//! Library lending backend.
//!
//! The crate follows a hexagonal layout: `domain` holds the entities,
//! services, and ports; `inbound` adapts HTTP onto the driving ports;
//! `outbound` implements the driven ports against PostgreSQL; `server`
//! wires everything into an Actix application.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
