//! Client and consensus states of the ICS-07 Tendermint light client.

use core::time::Duration;

use ibc_proto::google::protobuf::{Any, Timestamp as RawTimestamp};
use ibc_proto::ibc::core::commitment::v1::MerkleRoot;
use ibc_proto::ibc::lightclients::tendermint::v1::{
    ClientState as RawTmClientState, ConsensusState as RawTmConsensusState, Fraction,
};
use ibc_proto::Protobuf;
use tendermint::hash::Algorithm;
use tendermint::time::Time;
use tendermint::Hash;
use tendermint_proto::google::protobuf as tpb;

use crate::error::DecodingError;
use crate::height::{ClientHeight, Height};
use crate::identifiers::ChainId;
use crate::prelude::*;

pub const TENDERMINT_CLIENT_TYPE: &str = "07-tendermint";
pub const TENDERMINT_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.tendermint.v1.ClientState";
pub const TENDERMINT_CONSENSUS_STATE_TYPE_URL: &str =
    "/ibc.lightclients.tendermint.v1.ConsensusState";

/// Tendermint client state.
///
/// The fields a query client inspects are decoded; the remaining light client
/// parameters (trust level, clock drift, proof specs) are carried in their
/// raw form so the state re-encodes unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct TmClientState {
    pub chain_id: ChainId,
    pub latest_height: Height,
    pub frozen_height: Option<Height>,
    pub trusting_period: Duration,
    pub unbonding_period: Duration,
    raw: RawTmClientState,
}

impl TmClientState {
    /// Builds a client state with a 1/3 trust level and no upgrade path.
    pub fn new(
        chain_id: ChainId,
        latest_height: Height,
        trusting_period: Duration,
        unbonding_period: Duration,
    ) -> Self {
        #[allow(deprecated)]
        let raw = RawTmClientState {
            chain_id: chain_id.to_string(),
            trust_level: Some(Fraction {
                numerator: 1,
                denominator: 3,
            }),
            trusting_period: Some(trusting_period.into()),
            unbonding_period: Some(unbonding_period.into()),
            max_clock_drift: Some(Duration::from_secs(3).into()),
            frozen_height: Some(Default::default()),
            latest_height: Some(latest_height.into()),
            proof_specs: Vec::new(),
            upgrade_path: Vec::new(),
            allow_update_after_expiry: false,
            allow_update_after_misbehaviour: false,
        };

        Self {
            chain_id,
            latest_height,
            frozen_height: None,
            trusting_period,
            unbonding_period,
            raw,
        }
    }

    pub fn latest_height(&self) -> ClientHeight {
        ClientHeight::Revision(self.latest_height)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_height.is_some()
    }
}

impl Protobuf<RawTmClientState> for TmClientState {}

impl TryFrom<RawTmClientState> for TmClientState {
    type Error = DecodingError;

    fn try_from(raw: RawTmClientState) -> Result<Self, Self::Error> {
        let chain_id = raw.chain_id.parse()?;

        let latest_height = raw
            .latest_height
            .ok_or_else(|| DecodingError::missing_raw_data("latest height"))?
            .try_into()
            .map_err(|e| DecodingError::invalid_raw_data(format!("latest height: {e}")))?;

        // A zero frozen height means the client is active.
        let frozen_height = raw
            .frozen_height
            .and_then(|height| Height::try_from(height).ok());

        let trusting_period = raw
            .trusting_period
            .ok_or_else(|| DecodingError::missing_raw_data("trusting period"))?
            .try_into()
            .map_err(|_| DecodingError::invalid_raw_data("negative trusting period"))?;

        let unbonding_period = raw
            .unbonding_period
            .ok_or_else(|| DecodingError::missing_raw_data("unbonding period"))?
            .try_into()
            .map_err(|_| DecodingError::invalid_raw_data("negative unbonding period"))?;

        Ok(Self {
            chain_id,
            latest_height,
            frozen_height,
            trusting_period,
            unbonding_period,
            raw,
        })
    }
}

impl From<TmClientState> for RawTmClientState {
    #[allow(deprecated)]
    fn from(value: TmClientState) -> Self {
        RawTmClientState {
            chain_id: value.chain_id.to_string(),
            latest_height: Some(value.latest_height.into()),
            frozen_height: Some(value.frozen_height.map(Into::into).unwrap_or_default()),
            trusting_period: Some(value.trusting_period.into()),
            unbonding_period: Some(value.unbonding_period.into()),
            ..value.raw
        }
    }
}

impl From<TmClientState> for Any {
    fn from(client_state: TmClientState) -> Self {
        Any {
            type_url: TENDERMINT_CLIENT_STATE_TYPE_URL.to_string(),
            value: Protobuf::<RawTmClientState>::encode_vec(client_state),
        }
    }
}

/// Tendermint consensus state: the app hash root, block time and next
/// validator set hash of a trusted header.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TmConsensusState {
    pub timestamp: Time,
    pub root: Vec<u8>,
    pub next_validators_hash: Hash,
}

impl TmConsensusState {
    pub fn new(root: Vec<u8>, timestamp: Time, next_validators_hash: Hash) -> Self {
        Self {
            timestamp,
            root,
            next_validators_hash,
        }
    }
}

impl Protobuf<RawTmConsensusState> for TmConsensusState {}

impl TryFrom<RawTmConsensusState> for TmConsensusState {
    type Error = DecodingError;

    fn try_from(raw: RawTmConsensusState) -> Result<Self, Self::Error> {
        let root = raw
            .root
            .ok_or_else(|| DecodingError::missing_raw_data("commitment root"))?
            .hash;

        let RawTimestamp { seconds, nanos } = raw
            .timestamp
            .ok_or_else(|| DecodingError::missing_raw_data("timestamp"))?;
        // ibc-proto and tendermint-proto each define their own `Timestamp`.
        let timestamp = tpb::Timestamp { seconds, nanos }
            .try_into()
            .map_err(|e| DecodingError::invalid_raw_data(format!("timestamp: {e}")))?;

        let next_validators_hash = Hash::from_bytes(Algorithm::Sha256, &raw.next_validators_hash)
            .map_err(|e| DecodingError::invalid_raw_data(format!("next validators hash: {e}")))?;

        Ok(Self {
            timestamp,
            root,
            next_validators_hash,
        })
    }
}

impl From<TmConsensusState> for RawTmConsensusState {
    fn from(value: TmConsensusState) -> Self {
        let tpb::Timestamp { seconds, nanos } = value.timestamp.into();

        RawTmConsensusState {
            timestamp: Some(RawTimestamp { seconds, nanos }),
            root: Some(MerkleRoot { hash: value.root }),
            next_validators_hash: value.next_validators_hash.as_bytes().to_vec(),
        }
    }
}

impl From<TmConsensusState> for Any {
    fn from(consensus_state: TmConsensusState) -> Self {
        Any {
            type_url: TENDERMINT_CONSENSUS_STATE_TYPE_URL.to_string(),
            value: Protobuf::<RawTmConsensusState>::encode_vec(consensus_state),
        }
    }
}

impl From<tendermint::block::Header> for TmConsensusState {
    fn from(header: tendermint::block::Header) -> Self {
        Self {
            root: header.app_hash.as_ref().to_vec(),
            timestamp: header.time,
            next_validators_hash: header.next_validators_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_height_zero_means_active() {
        let client_state = TmClientState::new(
            ChainId::new("ibc-1").unwrap(),
            Height::new(1, 20).unwrap(),
            Duration::from_secs(64000),
            Duration::from_secs(128000),
        );
        let mut raw = RawTmClientState::from(client_state.clone());
        assert_eq!(raw.frozen_height, Some(Default::default()));
        assert!(!TmClientState::try_from(raw.clone()).unwrap().is_frozen());

        raw.frozen_height = Some(Height::new(1, 5).unwrap().into());
        let frozen = TmClientState::try_from(raw).unwrap();
        assert!(frozen.is_frozen());
        assert_eq!(frozen.latest_height(), ClientHeight::Revision(client_state.latest_height));
    }

    #[test]
    fn consensus_state_requires_root() {
        let raw = RawTmConsensusState {
            timestamp: Some(RawTimestamp {
                seconds: 1_700_000_000,
                nanos: 0,
            }),
            root: None,
            next_validators_hash: vec![0; 32],
        };
        assert!(TmConsensusState::try_from(raw).is_err());
    }
}
