//! Proof-backed client queries.

mod query;

pub use query::*;
