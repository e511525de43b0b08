//! Packet commitments and the opaque proof bytes that accompany proven
//! query results.

use core::fmt;

use ibc_proto::ibc::core::commitment::v1::MerkleProof as RawMerkleProof;
use prost::Message;
use subtle_encoding::{Encoding, Hex};

use crate::error::DecodingError;
use crate::prelude::*;

/// Raw packet commitment bytes as stored under
/// `commitments/ports/{port}/channels/{channel}/sequences/{seq}`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketCommitment(Vec<u8>);

impl PacketCommitment {
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for PacketCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PacketCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Serialized commitment proof, usually a protobuf encoded ICS-23
/// `MerkleProof`. Never empty.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, PartialEq, Eq, derive_more::Into)]
pub struct CommitmentProofBytes {
    #[cfg_attr(feature = "serde", serde(serialize_with = "ser_hex_upper"))]
    bytes: Vec<u8>,
}

impl CommitmentProofBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for CommitmentProofBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for CommitmentProofBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = Hex::upper_case()
            .encode_to_string(&self.bytes)
            .map_err(|_| fmt::Error)?;
        f.debug_tuple("CommitmentProof").field(&hex).finish()
    }
}

impl TryFrom<Vec<u8>> for CommitmentProofBytes {
    type Error = DecodingError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(DecodingError::invalid_raw_data("empty commitment proof"))
        } else {
            Ok(Self { bytes })
        }
    }
}

impl TryFrom<RawMerkleProof> for CommitmentProofBytes {
    type Error = DecodingError;

    fn try_from(proof: RawMerkleProof) -> Result<Self, Self::Error> {
        proof.encode_to_vec().try_into()
    }
}

impl TryFrom<&CommitmentProofBytes> for RawMerkleProof {
    type Error = DecodingError;

    fn try_from(value: &CommitmentProofBytes) -> Result<Self, Self::Error> {
        Ok(RawMerkleProof::decode(value.as_bytes())?)
    }
}

#[cfg(feature = "serde")]
fn ser_hex_upper<S, T>(data: T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: AsRef<[u8]>,
{
    let hex = Hex::upper_case()
        .encode_to_string(data)
        .map_err(|e| serde::ser::Error::custom(e.to_string()))?;
    serializer.serialize_str(&hex)
}

#[cfg(test)]
mod tests {
    use ibc_proto::ics23::CommitmentProof;

    use super::*;

    #[test]
    fn empty_proof_is_rejected() {
        assert!(CommitmentProofBytes::try_from(Vec::new()).is_err());
        assert!(CommitmentProofBytes::try_from(RawMerkleProof { proofs: vec![] }).is_err());
    }

    #[test]
    fn merkle_proof_round_trip() {
        let raw = RawMerkleProof {
            proofs: vec![CommitmentProof::default(), CommitmentProof::default()],
        };
        let bytes = CommitmentProofBytes::try_from(raw.clone()).expect("non-empty proof");
        assert_eq!(RawMerkleProof::try_from(&bytes).expect("decodes"), raw);
    }
}
