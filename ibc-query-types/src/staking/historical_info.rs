use ibc_proto::cosmos::staking::v1beta1::{
    HistoricalInfo as RawHistoricalInfo, Validator as RawValidator,
};
use prost::Message;
use tendermint::block::Header;

use super::{StakingError, Validator};
use crate::codec::ProtoCodec;
use crate::error::DecodingError;
use crate::prelude::*;

/// A block header and the validator set bonded at that block.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct HistoricalInfo {
    pub header: Header,
    pub valset: Vec<Validator>,
}

impl HistoricalInfo {
    /// Records `valset` in canonical order.
    pub fn new(header: Header, mut valset: Vec<Validator>) -> Self {
        valset.sort_by(Validator::cmp_operator);
        Self { header, valset }
    }

    /// Checks the validator set is non-empty and in canonical order.
    pub fn validate_basic(&self) -> Result<(), StakingError> {
        if self.valset.is_empty() {
            return Err(StakingError::InvalidHistoricalInfo {
                reason: "validator set is empty".to_string(),
            });
        }

        if !self
            .valset
            .windows(2)
            .all(|pair| pair[0].operator() <= pair[1].operator())
        {
            return Err(StakingError::InvalidHistoricalInfo {
                reason: "validator set is not sorted by address".to_string(),
            });
        }

        Ok(())
    }
}

impl TryFrom<HistoricalInfo> for RawHistoricalInfo {
    type Error = StakingError;

    fn try_from(value: HistoricalInfo) -> Result<Self, Self::Error> {
        Ok(RawHistoricalInfo {
            header: Some(value.header.into()),
            valset: value
                .valset
                .into_iter()
                .map(RawValidator::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Encodes `info` as a `cosmos.staking.v1beta1.HistoricalInfo`.
pub fn marshal_historical_info(info: &HistoricalInfo) -> Result<Vec<u8>, StakingError> {
    Ok(RawHistoricalInfo::try_from(info.clone())?.encode_to_vec())
}

/// Like [`marshal_historical_info`], for a record built from keys the caller
/// knows the type URL of.
///
/// # Panics
///
/// Panics if a consensus key cannot be packed.
pub fn must_marshal_historical_info(info: &HistoricalInfo) -> Vec<u8> {
    match marshal_historical_info(info) {
        Ok(bytes) => bytes,
        Err(e) => panic!("failed to marshal historical info: {e}"),
    }
}

/// Decodes a `cosmos.staking.v1beta1.HistoricalInfo`, unpacking every
/// validator's consensus key through `codec`. The validator order is kept
/// as stored.
pub fn unmarshal_historical_info(
    codec: &ProtoCodec,
    bytes: &[u8],
) -> Result<HistoricalInfo, StakingError> {
    let raw = RawHistoricalInfo::decode(bytes).map_err(DecodingError::from)?;

    let raw_header = raw
        .header
        .ok_or_else(|| DecodingError::missing_raw_data("historical info header"))?;
    let header = Header::try_from(raw_header)
        .map_err(|e| DecodingError::invalid_raw_data(format!("historical info header: {e}")))?;

    let valset = raw
        .valset
        .into_iter()
        .map(|validator| Validator::from_raw(codec, validator))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HistoricalInfo { header, valset })
}

/// Like [`unmarshal_historical_info`], for bytes the caller wrote itself.
///
/// # Panics
///
/// Panics if the bytes do not decode.
pub fn must_unmarshal_historical_info(codec: &ProtoCodec, bytes: &[u8]) -> HistoricalInfo {
    match unmarshal_historical_info(codec, bytes) {
        Ok(info) => info,
        Err(e) => panic!("failed to unmarshal historical info: {e}"),
    }
}
