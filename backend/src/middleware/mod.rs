//! Actix middleware shared by the HTTP surface.

pub mod trace;

pub use trace::{Trace, TraceId};
