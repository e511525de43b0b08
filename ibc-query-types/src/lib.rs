//! Domain types used when querying the IBC state of a chain from the outside.
//!
//! The crate covers the values a relayer or any other off-chain client reads
//! from an IBC enabled chain: [`Height`](height::Height)s, identifiers, the
//! ICS-24 store [`path`]s that map an identifier to a raw store key, channel
//! ends, packet commitments and the polymorphic client and consensus states,
//! which are unpacked through an explicitly passed [`ProtoCodec`](codec::ProtoCodec).
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    rust_2018_idioms
)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod channel;
pub mod client;
pub mod codec;
pub mod commitment;
pub mod error;
pub mod height;
pub mod identifiers;
pub mod path;
pub mod prelude;
pub mod staking;
mod validate;

/// Re-exports the raw proto types callers need to build requests and to
/// inspect packed payloads.
pub mod proto {
    pub use ibc_proto::google::protobuf::Any;
    pub use ibc_proto::Protobuf;
}
