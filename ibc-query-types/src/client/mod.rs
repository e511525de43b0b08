//! Light client states as the queried chain stores them.
//!
//! Client and consensus states travel packed in a `google.protobuf.Any`.
//! Query results keep them packed ([`IdentifiedClientState`],
//! [`IdentifiedConsensusState`]); callers unpack them into
//! [`AnyClientState`] / [`AnyConsensusState`] through a
//! [`ProtoCodec`](crate::codec::ProtoCodec).

pub mod mock;
pub mod solomachine;
pub mod tendermint;

use derive_more::From;
use ibc_proto::google::protobuf::Any;
use ibc_proto::ibc::core::client::v1::IdentifiedClientState as RawIdentifiedClientState;
use ibc_proto::Protobuf;

use self::mock::{MockClientState, MockConsensusState};
use self::solomachine::{SmClientState, SmConsensusState};
use self::tendermint::{TmClientState, TmConsensusState};
use crate::error::DecodingError;
use crate::height::ClientHeight;
use crate::identifiers::ClientId;
use crate::prelude::*;

/// An unpacked client state of any supported client type.
#[derive(Clone, Debug, PartialEq, From)]
pub enum AnyClientState {
    Tendermint(TmClientState),
    SoloMachine(SmClientState),
    Mock(MockClientState),
}

impl AnyClientState {
    /// The latest height the client tracks. Only solo machines report a
    /// [`ClientHeight::Sequence`].
    pub fn latest_height(&self) -> ClientHeight {
        match self {
            Self::Tendermint(cs) => cs.latest_height(),
            Self::SoloMachine(cs) => cs.latest_height(),
            Self::Mock(cs) => cs.latest_height(),
        }
    }

    pub fn is_frozen(&self) -> bool {
        match self {
            Self::Tendermint(cs) => cs.is_frozen(),
            Self::SoloMachine(cs) => cs.is_frozen,
            Self::Mock(cs) => cs.frozen,
        }
    }

    pub fn client_type(&self) -> &'static str {
        match self {
            Self::Tendermint(_) => tendermint::TENDERMINT_CLIENT_TYPE,
            Self::SoloMachine(_) => solomachine::SOLOMACHINE_CLIENT_TYPE,
            Self::Mock(_) => mock::MOCK_CLIENT_TYPE,
        }
    }
}

impl From<AnyClientState> for Any {
    fn from(value: AnyClientState) -> Self {
        match value {
            AnyClientState::Tendermint(cs) => cs.into(),
            AnyClientState::SoloMachine(cs) => cs.into(),
            AnyClientState::Mock(cs) => cs.into(),
        }
    }
}

/// An unpacked consensus state of any supported client type.
#[derive(Clone, Debug, PartialEq, From)]
pub enum AnyConsensusState {
    Tendermint(TmConsensusState),
    SoloMachine(SmConsensusState),
    Mock(MockConsensusState),
}

impl From<AnyConsensusState> for Any {
    fn from(value: AnyConsensusState) -> Self {
        match value {
            AnyConsensusState::Tendermint(cs) => cs.into(),
            AnyConsensusState::SoloMachine(cs) => cs.into(),
            AnyConsensusState::Mock(cs) => cs.into(),
        }
    }
}

/// A packed client state together with the client it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentifiedClientState {
    pub client_id: ClientId,
    pub client_state: Any,
}

impl IdentifiedClientState {
    pub fn new(client_id: ClientId, client_state: Any) -> Self {
        Self {
            client_id,
            client_state,
        }
    }
}

impl Protobuf<RawIdentifiedClientState> for IdentifiedClientState {}

impl TryFrom<RawIdentifiedClientState> for IdentifiedClientState {
    type Error = DecodingError;

    fn try_from(raw: RawIdentifiedClientState) -> Result<Self, Self::Error> {
        Ok(Self {
            client_id: raw.client_id.parse()?,
            client_state: raw
                .client_state
                .ok_or_else(|| DecodingError::missing_raw_data("identified client state"))?,
        })
    }
}

impl From<IdentifiedClientState> for RawIdentifiedClientState {
    fn from(value: IdentifiedClientState) -> Self {
        RawIdentifiedClientState {
            client_id: value.client_id.to_string(),
            client_state: Some(value.client_state),
        }
    }
}

/// A packed consensus state together with the client it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentifiedConsensusState {
    pub client_id: ClientId,
    pub consensus_state: Any,
}

impl IdentifiedConsensusState {
    pub fn new(client_id: ClientId, consensus_state: Any) -> Self {
        Self {
            client_id,
            consensus_state,
        }
    }
}
