use core::cmp::Ordering;

use ibc_proto::cosmos::staking::v1beta1::{
    Commission, Description, Validator as RawValidator,
};
use ibc_proto::google::protobuf::Timestamp;
use subtle_encoding::bech32;

use super::{ConsensusPubKey, StakingError};
use crate::codec::ProtoCodec;
use crate::error::DecodingError;
use crate::prelude::*;

/// Bonding status of a validator.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BondStatus {
    Unspecified = 0isize,
    Unbonded = 1isize,
    Unbonding = 2isize,
    Bonded = 3isize,
}

impl BondStatus {
    pub fn from_i32(status: i32) -> Result<Self, DecodingError> {
        match status {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Unbonded),
            2 => Ok(Self::Unbonding),
            3 => Ok(Self::Bonded),
            _ => Err(DecodingError::invalid_raw_data(format!(
                "bond status must be one of 0 to 3; got {status}"
            ))),
        }
    }
}

/// A validator entry of a historical validator set.
///
/// The operator address is kept both as the bech32 string and as the decoded
/// bytes; validator sets are ordered by the decoded bytes. Every other field
/// of the stored record is kept so that re-encoding yields the same bytes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Validator {
    operator_address: String,
    operator_bytes: Vec<u8>,
    pub consensus_pubkey: ConsensusPubKey,
    pub jailed: bool,
    pub status: BondStatus,
    pub tokens: String,
    pub delegator_shares: String,
    pub description: Option<Description>,
    pub unbonding_height: i64,
    pub unbonding_time: Option<Timestamp>,
    pub commission: Option<Commission>,
    pub min_self_delegation: String,
    pub unbonding_on_hold_ref_count: i64,
    pub unbonding_ids: Vec<u64>,
}

impl Validator {
    /// A bonded, unjailed validator without stake.
    pub fn new(
        operator_address: &str,
        consensus_pubkey: ConsensusPubKey,
    ) -> Result<Self, DecodingError> {
        Ok(Self {
            operator_address: operator_address.to_string(),
            operator_bytes: decode_operator(operator_address)?,
            consensus_pubkey,
            jailed: false,
            status: BondStatus::Bonded,
            tokens: "0".to_string(),
            delegator_shares: "0".to_string(),
            description: None,
            unbonding_height: 0,
            unbonding_time: None,
            commission: None,
            min_self_delegation: "1".to_string(),
            unbonding_on_hold_ref_count: 0,
            unbonding_ids: Vec::new(),
        })
    }

    pub fn with_tokens(self, tokens: u64) -> Self {
        Self {
            tokens: tokens.to_string(),
            delegator_shares: tokens.to_string(),
            ..self
        }
    }

    pub fn operator_address(&self) -> &str {
        &self.operator_address
    }

    /// The operator address without its bech32 prefix and checksum.
    pub fn operator(&self) -> &[u8] {
        &self.operator_bytes
    }

    /// Canonical validator set order: byte-wise on the decoded operator
    /// address.
    pub fn cmp_operator(&self, other: &Self) -> Ordering {
        self.operator_bytes.cmp(&other.operator_bytes)
    }

    /// Decodes a raw validator, unpacking its consensus key through `codec`.
    pub fn from_raw(codec: &ProtoCodec, raw: RawValidator) -> Result<Self, StakingError> {
        let packed_key = raw
            .consensus_pubkey
            .ok_or_else(|| DecodingError::missing_raw_data("validator consensus key"))?;

        let consensus_pubkey =
            codec
                .unpack_public_key(&packed_key)
                .map_err(|error| StakingError::ConsensusKey {
                    operator_address: raw.operator_address.clone(),
                    error,
                })?;

        Ok(Self {
            operator_bytes: decode_operator(&raw.operator_address)?,
            operator_address: raw.operator_address,
            consensus_pubkey,
            jailed: raw.jailed,
            status: BondStatus::from_i32(raw.status)?,
            tokens: raw.tokens,
            delegator_shares: raw.delegator_shares,
            description: raw.description,
            unbonding_height: raw.unbonding_height,
            unbonding_time: raw.unbonding_time,
            commission: raw.commission,
            min_self_delegation: raw.min_self_delegation,
            unbonding_on_hold_ref_count: raw.unbonding_on_hold_ref_count,
            unbonding_ids: raw.unbonding_ids,
        })
    }
}

impl TryFrom<Validator> for RawValidator {
    type Error = StakingError;

    fn try_from(value: Validator) -> Result<Self, Self::Error> {
        Ok(RawValidator {
            operator_address: value.operator_address,
            consensus_pubkey: Some(value.consensus_pubkey.try_into()?),
            jailed: value.jailed,
            status: value.status as i32,
            tokens: value.tokens,
            delegator_shares: value.delegator_shares,
            description: value.description,
            unbonding_height: value.unbonding_height,
            unbonding_time: value.unbonding_time,
            commission: value.commission,
            min_self_delegation: value.min_self_delegation,
            unbonding_on_hold_ref_count: value.unbonding_on_hold_ref_count,
            unbonding_ids: value.unbonding_ids,
        })
    }
}

fn decode_operator(address: &str) -> Result<Vec<u8>, DecodingError> {
    bech32::decode(address)
        .map(|(_hrp, bytes)| bytes)
        .map_err(|e| DecodingError::InvalidBech32 {
            address: address.to_string(),
            description: e.to_string(),
        })
}
