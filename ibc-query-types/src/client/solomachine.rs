//! Client and consensus states of the ICS-06 solo machine client.
//!
//! A solo machine has no chain height. Its client advances a sequence with
//! every signed update and reports that sequence as its latest height.

use ibc_proto::google::protobuf::Any;
use ibc_proto::ibc::lightclients::solomachine::v3::{
    ClientState as RawSmClientState, ConsensusState as RawSmConsensusState,
};
use ibc_proto::Protobuf;

use crate::error::DecodingError;
use crate::height::ClientHeight;
use crate::prelude::*;

pub const SOLOMACHINE_CLIENT_TYPE: &str = "06-solomachine";
pub const SOLOMACHINE_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.solomachine.v3.ClientState";
pub const SOLOMACHINE_CONSENSUS_STATE_TYPE_URL: &str =
    "/ibc.lightclients.solomachine.v3.ConsensusState";

#[derive(Clone, Debug, PartialEq)]
pub struct SmClientState {
    pub sequence: u64,
    pub is_frozen: bool,
    pub consensus_state: SmConsensusState,
}

impl SmClientState {
    pub fn new(sequence: u64, consensus_state: SmConsensusState) -> Self {
        Self {
            sequence,
            is_frozen: false,
            consensus_state,
        }
    }

    pub fn latest_height(&self) -> ClientHeight {
        ClientHeight::Sequence(self.sequence)
    }
}

impl Protobuf<RawSmClientState> for SmClientState {}

impl TryFrom<RawSmClientState> for SmClientState {
    type Error = DecodingError;

    fn try_from(raw: RawSmClientState) -> Result<Self, Self::Error> {
        Ok(Self {
            sequence: raw.sequence,
            is_frozen: raw.is_frozen,
            consensus_state: raw
                .consensus_state
                .ok_or_else(|| DecodingError::missing_raw_data("solo machine consensus state"))?
                .try_into()?,
        })
    }
}

impl From<SmClientState> for RawSmClientState {
    fn from(value: SmClientState) -> Self {
        RawSmClientState {
            sequence: value.sequence,
            is_frozen: value.is_frozen,
            consensus_state: Some(value.consensus_state.into()),
        }
    }
}

impl From<SmClientState> for Any {
    fn from(client_state: SmClientState) -> Self {
        Any {
            type_url: SOLOMACHINE_CLIENT_STATE_TYPE_URL.to_string(),
            value: Protobuf::<RawSmClientState>::encode_vec(client_state),
        }
    }
}

/// The key, diversifier and timestamp the solo machine signs with. The
/// public key stays packed.
#[derive(Clone, Debug, PartialEq)]
pub struct SmConsensusState {
    pub public_key: Any,
    pub diversifier: String,
    pub timestamp: u64,
}

impl Protobuf<RawSmConsensusState> for SmConsensusState {}

impl TryFrom<RawSmConsensusState> for SmConsensusState {
    type Error = DecodingError;

    fn try_from(raw: RawSmConsensusState) -> Result<Self, Self::Error> {
        Ok(Self {
            public_key: raw
                .public_key
                .ok_or_else(|| DecodingError::missing_raw_data("solo machine public key"))?,
            diversifier: raw.diversifier,
            timestamp: raw.timestamp,
        })
    }
}

impl From<SmConsensusState> for RawSmConsensusState {
    fn from(value: SmConsensusState) -> Self {
        RawSmConsensusState {
            public_key: Some(value.public_key),
            diversifier: value.diversifier,
            timestamp: value.timestamp,
        }
    }
}

impl From<SmConsensusState> for Any {
    fn from(consensus_state: SmConsensusState) -> Self {
        Any {
            type_url: SOLOMACHINE_CONSENSUS_STATE_TYPE_URL.to_string(),
            value: Protobuf::<RawSmConsensusState>::encode_vec(consensus_state),
        }
    }
}
