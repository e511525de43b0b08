#![allow(dead_code)]

use ibc_proto::ibc::core::commitment::v1::MerkleProof as RawMerkleProof;
use ibc_proto::ics23::commitment_proof::Proof;
use ibc_query_client::types::QueryResult;
use ibc_query_testkit::chain::{MockChain, MockChainConfig};
use ibc_query_testkit::fixtures::channel::dummy_channel_end;
use ibc_query_testkit::fixtures::clients::{dummy_mock_client_state, dummy_mock_consensus_state};
use ibc_query_types::client::mock::MOCK_CLIENT_TYPE;
use ibc_query_types::height::Height;
use ibc_query_types::identifiers::{ChannelId, ClientId, ConnectionId, PortId};

/// Height of the chain the queries are served at.
pub const CHAIN_HEIGHT: u64 = 25;

/// Latest height the channel's client has seen of its counterparty.
pub const CLIENT_HEIGHT: u64 = 10;

pub fn height(revision_height: u64) -> Height {
    Height::new(0, revision_height).expect("Never fails")
}

pub fn transfer_channel() -> (PortId, ChannelId) {
    (PortId::transfer(), ChannelId::zero())
}

pub fn mock_client_id() -> ClientId {
    ClientId::new(MOCK_CLIENT_TYPE, 0).expect("Never fails")
}

/// A chain at `CHAIN_HEIGHT` with an open `transfer/channel-0` on
/// `connection-0`, which is built on a mock client at `CLIENT_HEIGHT`.
pub fn chain_with_channel() -> MockChain {
    let (port_id, channel_id) = transfer_channel();
    let client_id = mock_client_id();

    MockChainConfig::builder()
        .latest_height(height(CHAIN_HEIGHT))
        .build()
        .with_connection(ConnectionId::zero(), client_id.clone())
        .with_channel(&port_id, &channel_id, dummy_channel_end())
        .with_client_state(&client_id, dummy_mock_client_state(height(CLIENT_HEIGHT)))
        .with_consensus_state(
            &client_id,
            height(CLIENT_HEIGHT),
            dummy_mock_consensus_state(height(CLIENT_HEIGHT)),
        )
}

/// Decodes the proof of a proven result and returns the key and value its
/// first, store level, proof is about.
pub fn proven_entry<T>(result: &QueryResult<T>) -> (Vec<u8>, Vec<u8>) {
    let proof = result.proof.as_ref().expect("proven result");
    let merkle_proof = RawMerkleProof::try_from(proof).expect("valid merkle proof");

    match merkle_proof.proofs[0].proof.as_ref() {
        Some(Proof::Exist(existence)) => (existence.key.clone(), existence.value.clone()),
        other => panic!("expected an existence proof, got {other:?}"),
    }
}

pub fn proven_key<T>(result: &QueryResult<T>) -> Vec<u8> {
    proven_entry(result).0
}
