//! Foundational error types shared by the query types.

use displaydoc::Display;
use prost::DecodeError as ProstError;
use tendermint_proto::Error as ProtoError;

use crate::prelude::*;

/// Errors that arise when parsing identifiers.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Display, PartialEq, Eq)]
pub enum IdentifierError {
    /// id `{id}` has invalid length; must be between [`{min}`,`{max}`)
    InvalidLength { id: String, min: u64, max: u64 },
    /// id `{id}` can only contain alphanumeric characters or `.`, `_`, `+`, `-`, `#`, - `[`, `]`, `<`, `>`
    InvalidCharacter { id: String },
    /// invalid prefix: `{prefix}`
    InvalidPrefix { prefix: String },
    /// failed to parse `{value}` as a sequence: `{reason}`
    InvalidStringAsSequence { value: String, reason: String },
    /// overflowed revision number
    RevisionNumberOverflow,
}

/// Errors that occur while decoding raw store values or raw query responses
/// into domain types.
#[derive(Debug, Display)]
pub enum DecodingError {
    /// identifier error: `{0}`
    Identifier(IdentifierError),
    /// protobuf decoding error: `{0}`
    Protobuf(ProtoError),
    /// prost decoding error: `{0}`
    Prost(ProstError),
    /// invalid raw data: `{description}`
    InvalidRawData { description: String },
    /// missing raw data: `{description}`
    MissingRawData { description: String },
    /// mismatched type URLs: expected `{expected}`, actual `{actual}`
    MismatchedTypeUrls { expected: String, actual: String },
    /// invalid bech32 address `{address}`: `{description}`
    InvalidBech32 { address: String, description: String },
}

impl DecodingError {
    pub fn invalid_raw_data<T: ToString>(description: T) -> Self {
        Self::InvalidRawData {
            description: description.to_string(),
        }
    }

    pub fn missing_raw_data<T: ToString>(description: T) -> Self {
        Self::MissingRawData {
            description: description.to_string(),
        }
    }
}

impl From<IdentifierError> for DecodingError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

impl From<ProtoError> for DecodingError {
    fn from(e: ProtoError) -> Self {
        Self::Protobuf(e)
    }
}

impl From<ProstError> for DecodingError {
    fn from(e: ProstError) -> Self {
        Self::Prost(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IdentifierError {}

#[cfg(feature = "std")]
impl std::error::Error for DecodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Identifier(e) => Some(e),
            Self::Prost(e) => Some(e),
            _ => None,
        }
    }
}
