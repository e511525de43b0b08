use crate::error::{DecodingError, IdentifierError};
use crate::prelude::*;

/// Packet sequence number.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence(u64);

impl Sequence {
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Encodes the sequence number as 8 big-endian bytes, the layout the
    /// store uses for `nextSequenceRecv` values.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_be_bytes().to_vec()
    }

    /// Decodes a sequence stored as exactly 8 big-endian bytes.
    ///
    /// ```
    /// use ibc_query_types::identifiers::Sequence;
    ///
    /// let seq = Sequence::from_be_slice(&[0, 0, 0, 0, 0, 0, 0, 0x2A]).unwrap();
    /// assert_eq!(seq.value(), 42);
    /// assert!(Sequence::from_be_slice(&[0x2A]).is_err());
    /// ```
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, DecodingError> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| {
            DecodingError::invalid_raw_data(format!(
                "sequence must be 8 big-endian bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(u64::from_be_bytes(raw)))
    }
}

impl core::str::FromStr for Sequence {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|e| IdentifierError::InvalidStringAsSequence {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<u64> for Sequence {
    fn from(seq: u64) -> Self {
        Sequence(seq)
    }
}

impl From<Sequence> for u64 {
    fn from(s: Sequence) -> u64 {
        s.0
    }
}

impl core::fmt::Display for Sequence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::empty(&[])]
    #[case::short(&[0x2A])]
    #[case::long(&[0; 9])]
    fn rejects_non_u64_width(#[case] bytes: &[u8]) {
        assert!(Sequence::from_be_slice(bytes).is_err());
    }

    #[test]
    fn be_bytes_round_trip() {
        let seq = Sequence::from(u64::MAX - 7);
        assert_eq!(Sequence::from_be_slice(&seq.to_vec()).unwrap(), seq);
    }
}
