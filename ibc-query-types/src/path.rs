//! ICS-24 store paths of the resources the query client reads.
//!
//! Every path renders to the key under which the chain's IBC store keeps the
//! resource; the proof-backed queries look values up by exactly these bytes.

use derive_more::{Display, From};

use crate::height::Height;
use crate::identifiers::{ChannelId, ClientId, PortId, Sequence};
use crate::prelude::*;

pub const CLIENT_PREFIX: &str = "clients";
pub const CLIENT_STATE: &str = "clientState";
pub const CONSENSUS_STATE_PREFIX: &str = "consensusStates";
pub const CHANNEL_PREFIX: &str = "channels";
pub const CHANNEL_END_PREFIX: &str = "channelEnds";
pub const PORT_PREFIX: &str = "ports";
pub const SEQUENCE_PREFIX: &str = "sequences";
pub const NEXT_SEQ_RECV_PREFIX: &str = "nextSequenceRecv";
pub const PACKET_COMMITMENT_PREFIX: &str = "commitments";

/// The store key of any queryable resource.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
pub enum Path {
    ClientState(ClientStatePath),
    ClientConsensusState(ClientConsensusStatePath),
    ChannelEnd(ChannelEndPath),
    SeqRecv(SeqRecvPath),
    Commitment(CommitmentPath),
}

impl Path {
    pub fn into_bytes(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
#[display(fmt = "{CLIENT_PREFIX}/{_0}/{CLIENT_STATE}")]
pub struct ClientStatePath(pub ClientId);

impl ClientStatePath {
    pub fn new(client_id: ClientId) -> ClientStatePath {
        ClientStatePath(client_id)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{CLIENT_PREFIX}/{client_id}/{CONSENSUS_STATE_PREFIX}/{revision_number}-{revision_height}"
)]
pub struct ClientConsensusStatePath {
    pub client_id: ClientId,
    pub revision_number: u64,
    pub revision_height: u64,
}

impl ClientConsensusStatePath {
    pub fn new(client_id: ClientId, height: Height) -> ClientConsensusStatePath {
        ClientConsensusStatePath {
            client_id,
            revision_number: height.revision_number(),
            revision_height: height.revision_height(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{CHANNEL_END_PREFIX}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}")]
pub struct ChannelEndPath(pub PortId, pub ChannelId);

impl ChannelEndPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> ChannelEndPath {
        ChannelEndPath(port_id.clone(), channel_id.clone())
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{NEXT_SEQ_RECV_PREFIX}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}")]
pub struct SeqRecvPath(pub PortId, pub ChannelId);

impl SeqRecvPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> SeqRecvPath {
        SeqRecvPath(port_id.clone(), channel_id.clone())
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{PACKET_COMMITMENT_PREFIX}/{PORT_PREFIX}/{port_id}/{CHANNEL_PREFIX}/{channel_id}/{SEQUENCE_PREFIX}/{sequence}"
)]
pub struct CommitmentPath {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

impl CommitmentPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId, sequence: Sequence) -> CommitmentPath {
        CommitmentPath {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            sequence,
        }
    }
}

/// Store key of a channel end.
pub fn key_channel(port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
    Path::from(ChannelEndPath::new(port_id, channel_id)).into_bytes()
}

/// Store key of a packet commitment.
pub fn key_packet_commitment(
    port_id: &PortId,
    channel_id: &ChannelId,
    sequence: Sequence,
) -> Vec<u8> {
    Path::from(CommitmentPath::new(port_id, channel_id, sequence)).into_bytes()
}

/// Store key of the next sequence to be received on a channel.
pub fn key_next_sequence_recv(port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
    Path::from(SeqRecvPath::new(port_id, channel_id)).into_bytes()
}

/// Store key of a client state.
pub fn full_client_state_key(client_id: &ClientId) -> Vec<u8> {
    Path::from(ClientStatePath::new(client_id.clone())).into_bytes()
}

/// Store key of a client's consensus state at the given height.
pub fn full_consensus_state_key(client_id: &ClientId, height: Height) -> Vec<u8> {
    Path::from(ClientConsensusStatePath::new(client_id.clone(), height)).into_bytes()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn transfer_channel() -> (PortId, ChannelId) {
        (PortId::transfer(), ChannelId::new(0))
    }

    #[rstest]
    #[case(
        key_channel(&transfer_channel().0, &transfer_channel().1),
        "channelEnds/ports/transfer/channels/channel-0"
    )]
    #[case(
        key_packet_commitment(&transfer_channel().0, &transfer_channel().1, 5.into()),
        "commitments/ports/transfer/channels/channel-0/sequences/5"
    )]
    #[case(
        key_next_sequence_recv(&transfer_channel().0, &transfer_channel().1),
        "nextSequenceRecv/ports/transfer/channels/channel-0"
    )]
    #[case(
        full_client_state_key(&"07-tendermint-0".parse().unwrap()),
        "clients/07-tendermint-0/clientState"
    )]
    #[case(
        full_consensus_state_key(&"07-tendermint-0".parse().unwrap(), Height::new(1, 12).unwrap()),
        "clients/07-tendermint-0/consensusStates/1-12"
    )]
    fn store_keys(#[case] key: Vec<u8>, #[case] expected: &str) {
        assert_eq!(key, expected.as_bytes());
    }
}
