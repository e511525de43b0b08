//! Test utilities for `ibc-query-client`.
//!
//! [`MockChain`](chain::MockChain) keeps an in-memory IBC store, commits a
//! snapshot of it at every block and answers both proof-backed store queries
//! and direct channel queries from those snapshots. The [`fixtures`] module
//! provides ready-made channel ends, client states and validator sets.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

pub mod chain;
pub mod fixtures;
