//! Reads the IBC state of a remote chain: channel ends, packet commitments,
//! next receive sequences and the light client states behind a channel.
//!
//! Every query runs in one of two modes selected by
//! [`IncludeProof`](types::IncludeProof):
//!
//! - `No`: a direct gRPC query through [`ChannelQuery`](context::ChannelQuery).
//!   Cheap, unproven.
//! - `Yes`: a store query through [`ProofQuery`](context::ProofQuery) on the
//!   resource's ICS-24 key, returning the value together with a Merkle proof
//!   and the height the proof verifies at.
//!
//! Both modes produce the same [`QueryResult`](types::QueryResult), so code
//! consuming the result does not care which mode produced it.
//!
//! The [`cosmos`] module provides a [`QueryContext`](context::QueryContext)
//! backed by a Cosmos SDK node.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

pub mod context;
pub mod core;
pub mod cosmos;
pub mod error;
pub mod types;
