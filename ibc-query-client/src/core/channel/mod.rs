//! Channel queries and the client and consensus states behind a channel.

mod query;

pub use query::*;
