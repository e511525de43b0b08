//! Chain heights and the heights light clients report.

use core::cmp::Ordering;
use core::num::ParseIntError;
use core::str::FromStr;

use displaydoc::Display;
use ibc_proto::ibc::core::client::v1::Height as RawHeight;
use ibc_proto::Protobuf;

use crate::prelude::*;

/// The height of a chain, as the number of blocks since genesis or since the
/// last revision (hard upgrade).
///
/// A revision height of zero stands for "no height" on the wire and is
/// rejected on construction.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedHeight"))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Height {
    revision_number: u64,
    revision_height: u64,
}

impl Height {
    pub fn new(revision_number: u64, revision_height: u64) -> Result<Self, HeightError> {
        if revision_height == 0 {
            return Err(HeightError::ZeroHeight);
        }

        Ok(Self {
            revision_number,
            revision_height,
        })
    }

    pub fn revision_number(&self) -> u64 {
        self.revision_number
    }

    pub fn revision_height(&self) -> u64 {
        self.revision_height
    }

    pub fn add(&self, delta: u64) -> Height {
        Height {
            revision_number: self.revision_number,
            revision_height: self.revision_height.saturating_add(delta),
        }
    }

    pub fn increment(&self) -> Height {
        self.add(1)
    }

    pub fn sub(&self, delta: u64) -> Result<Height, HeightError> {
        if self.revision_height <= delta {
            return Err(HeightError::ZeroHeight);
        }

        Ok(Height {
            revision_number: self.revision_number,
            revision_height: self.revision_height - delta,
        })
    }

    pub fn decrement(&self) -> Result<Height, HeightError> {
        self.sub(1)
    }
}

impl PartialOrd for Height {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Height {
    fn cmp(&self, other: &Self) -> Ordering {
        self.revision_number
            .cmp(&other.revision_number)
            .then(self.revision_height.cmp(&other.revision_height))
    }
}

/// The serialized form of [`Height`], checked on its way in.
#[cfg(feature = "serde")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(serde::Deserialize)]
struct UncheckedHeight {
    revision_number: u64,
    revision_height: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedHeight> for Height {
    type Error = HeightError;

    fn try_from(height: UncheckedHeight) -> Result<Self, Self::Error> {
        Height::new(height.revision_number, height.revision_height)
    }
}

impl Protobuf<RawHeight> for Height {}

impl TryFrom<RawHeight> for Height {
    type Error = HeightError;

    fn try_from(raw_height: RawHeight) -> Result<Self, Self::Error> {
        Height::new(raw_height.revision_number, raw_height.revision_height)
    }
}

impl From<Height> for RawHeight {
    fn from(height: Height) -> Self {
        RawHeight {
            revision_number: height.revision_number,
            revision_height: height.revision_height,
        }
    }
}

impl core::fmt::Debug for Height {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        f.debug_struct("Height")
            .field("revision", &self.revision_number)
            .field("height", &self.revision_height)
            .finish()
    }
}

impl core::fmt::Display for Height {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

impl FromStr for Height {
    type Err = HeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, height) = s.split_once('-').ok_or_else(|| HeightError::InvalidFormat {
            raw_height: s.to_owned(),
        })?;

        let parse = |part: &str| {
            part.parse::<u64>()
                .map_err(|error| HeightError::HeightConversion {
                    height: s.to_owned(),
                    error,
                })
        };

        Height::new(parse(number)?, parse(height)?)
    }
}

/// The latest height a light client reports through its generic accessor.
///
/// Chain-tracking clients report a revision [`Height`]; solo machines report
/// the sequence of their last signed update instead.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClientHeight {
    Revision(Height),
    Sequence(u64),
}

impl ClientHeight {
    /// Name of the concrete height shape, as used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Revision(_) => "Height",
            Self::Sequence(_) => "Sequence",
        }
    }
}

impl From<Height> for ClientHeight {
    fn from(height: Height) -> Self {
        Self::Revision(height)
    }
}

impl TryFrom<ClientHeight> for Height {
    type Error = HeightError;

    fn try_from(height: ClientHeight) -> Result<Self, Self::Error> {
        match height {
            ClientHeight::Revision(height) => Ok(height),
            other => Err(HeightError::MismatchedHeightType {
                expected: "Height".to_string(),
                actual: other.kind().to_string(),
            }),
        }
    }
}

impl core::fmt::Display for ClientHeight {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            Self::Revision(height) => write!(f, "{height}"),
            Self::Sequence(sequence) => write!(f, "sequence {sequence}"),
        }
    }
}

/// Encodes all errors related to heights.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum HeightError {
    /// cannot convert into a `Height` type from string `{height}`
    HeightConversion {
        height: String,
        error: ParseIntError,
    },
    /// attempted to create an invalid zero height
    ZeroHeight,
    /// the height(`{raw_height}`) is not valid format, this format must be used: \[revision_number\]-\[revision_height\]
    InvalidFormat { raw_height: String },
    /// mismatched height type: expected `{expected}`, actual `{actual}`
    MismatchedHeightType { expected: String, actual: String },
}

#[cfg(feature = "std")]
impl std::error::Error for HeightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            HeightError::HeightConversion { error: e, .. } => Some(e),
            _ => None,
        }
    }
}
