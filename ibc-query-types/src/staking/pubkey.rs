//! Validator consensus keys as packed by the Cosmos SDK.

use ibc_proto::google::protobuf::Any;
use prost::Message;
use tendermint::PublicKey;

use super::StakingError;
use crate::error::DecodingError;
use crate::prelude::*;

pub const ED25519_PUB_KEY_TYPE_URL: &str = "/cosmos.crypto.ed25519.PubKey";
pub const SECP256K1_PUB_KEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// Both `cosmos.crypto.ed25519.PubKey` and `cosmos.crypto.secp256k1.PubKey`
/// share this layout.
#[derive(Clone, PartialEq, Message)]
pub struct RawPubKey {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
}

/// A validator's consensus public key.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConsensusPubKey(pub PublicKey);

impl ConsensusPubKey {
    /// The type URL the key is packed under, if the Cosmos SDK knows its kind.
    pub fn type_url(&self) -> Option<&'static str> {
        match self.0 {
            PublicKey::Ed25519(_) => Some(ED25519_PUB_KEY_TYPE_URL),
            PublicKey::Secp256k1(_) => Some(SECP256K1_PUB_KEY_TYPE_URL),
            _ => None,
        }
    }
}

impl TryFrom<ConsensusPubKey> for Any {
    type Error = StakingError;

    fn try_from(key: ConsensusPubKey) -> Result<Self, Self::Error> {
        let type_url = key
            .type_url()
            .ok_or_else(|| StakingError::UnsupportedConsensusKey {
                key: format!("{:?}", key.0),
            })?;

        Ok(Any {
            type_url: type_url.to_string(),
            value: RawPubKey { key: key.0.to_bytes() }.encode_to_vec(),
        })
    }
}

pub(crate) fn decode_ed25519(bytes: &[u8]) -> Result<ConsensusPubKey, DecodingError> {
    let raw = RawPubKey::decode(bytes)?;
    PublicKey::from_raw_ed25519(&raw.key)
        .map(ConsensusPubKey)
        .ok_or_else(|| DecodingError::invalid_raw_data("malformed ed25519 public key"))
}

pub(crate) fn decode_secp256k1(bytes: &[u8]) -> Result<ConsensusPubKey, DecodingError> {
    let raw = RawPubKey::decode(bytes)?;
    PublicKey::from_raw_secp256k1(&raw.key)
        .map(ConsensusPubKey)
        .ok_or_else(|| DecodingError::invalid_raw_data("malformed secp256k1 public key"))
}
