mod common;

use common::{
    chain_with_channel, height, mock_client_id, proven_entry, proven_key, transfer_channel,
    CHAIN_HEIGHT, CLIENT_HEIGHT,
};
use ibc_query_client::core::channel::{query_channel_client_state, query_channel_consensus_state};
use ibc_query_client::core::client::{
    query_client_state_with_proof, query_consensus_state_with_proof,
};
use ibc_query_client::error::{MissingResource, QueryError};
use ibc_query_client::types::IncludeProof;
use ibc_query_testkit::chain::MockChain;
use ibc_query_testkit::fixtures::clients::{dummy_mock_client_state, dummy_mock_consensus_state};
use ibc_query_types::client::mock::{MockConsensusState, MockHeader, MOCK_CLIENT_TYPE};
use ibc_query_types::identifiers::ClientId;
use ibc_query_types::path::{full_client_state_key, full_consensus_state_key};
use ibc_query_types::proto::Any;
use prost::Message;
use rstest::rstest;

#[rstest]
#[case::proven(IncludeProof::Yes)]
#[case::direct(IncludeProof::No)]
fn channel_client_state_resolves_the_client(#[case] include_proof: IncludeProof) {
    let (port_id, channel_id) = transfer_channel();
    let chain = chain_with_channel();

    let result = query_channel_client_state(&chain, &port_id, &channel_id, include_proof)
        .expect("stored client state");

    assert_eq!(result.value.client_id, mock_client_id());
    assert_eq!(
        result.value.client_state,
        Any::from(dummy_mock_client_state(height(CLIENT_HEIGHT)))
    );
    assert_eq!(result.query_height, height(CHAIN_HEIGHT));
    assert_eq!(result.proof.is_some(), include_proof.to_bool());
}

#[test_log::test]
fn channel_client_state_proof_is_client_scoped() {
    let (port_id, channel_id) = transfer_channel();
    let chain = chain_with_channel();

    let result = query_channel_client_state(&chain, &port_id, &channel_id, IncludeProof::Yes)
        .expect("stored client state");

    assert_eq!(proven_key(&result), full_client_state_key(&mock_client_id()));
}

#[rstest]
#[case::proven(IncludeProof::Yes)]
#[case::direct(IncludeProof::No)]
fn channel_consensus_state_resolves_the_client(#[case] include_proof: IncludeProof) {
    let (port_id, channel_id) = transfer_channel();
    let chain = chain_with_channel();

    let result = query_channel_consensus_state(
        &chain,
        &port_id,
        &channel_id,
        height(CLIENT_HEIGHT),
        include_proof,
    )
    .expect("stored consensus state");

    assert_eq!(result.value.client_id, mock_client_id());
    assert_eq!(
        result.value.consensus_state,
        Any::from(dummy_mock_consensus_state(height(CLIENT_HEIGHT)))
    );
    assert_eq!(result.proof_height().is_some(), include_proof.to_bool());
}

#[test_log::test]
fn channel_consensus_state_proof_is_client_scoped() {
    let (port_id, channel_id) = transfer_channel();
    let chain = chain_with_channel();

    let result = query_channel_consensus_state(
        &chain,
        &port_id,
        &channel_id,
        height(CLIENT_HEIGHT),
        IncludeProof::Yes,
    )
    .expect("stored consensus state");

    assert_eq!(
        proven_key(&result),
        full_consensus_state_key(&mock_client_id(), height(CLIENT_HEIGHT))
    );
}

#[test_log::test]
fn channel_consensus_state_at_unknown_height_fails() {
    let (port_id, channel_id) = transfer_channel();
    let chain = chain_with_channel();

    let res = query_channel_consensus_state(
        &chain,
        &port_id,
        &channel_id,
        height(CLIENT_HEIGHT - 1),
        IncludeProof::No,
    );

    assert!(matches!(res, Err(QueryError::Transport(_))));
}

#[test_log::test]
fn client_state_of_unknown_client_is_not_found() {
    let chain = chain_with_channel();
    let client_id = ClientId::new(MOCK_CLIENT_TYPE, 4).expect("Never fails");

    let err = query_client_state_with_proof(&chain, &client_id).expect_err("unknown client");

    assert_eq!(
        err.to_string(),
        QueryError::NotFound(MissingResource::ClientState { client_id }).to_string()
    );
}

#[test_log::test]
fn consensus_state_at_unknown_height_is_not_found() {
    let chain = chain_with_channel();
    let client_id = mock_client_id();

    let err = query_consensus_state_with_proof(&chain, &client_id, height(CLIENT_HEIGHT + 1))
        .expect_err("no consensus state at that height");

    assert!(matches!(
        err,
        QueryError::NotFound(MissingResource::ConsensusState { height: h, .. })
            if h == height(CLIENT_HEIGHT + 1)
    ));
}

#[test_log::test]
fn malformed_client_state_fails_to_decode() {
    let client_id = mock_client_id();
    let chain = chain_with_channel().with_raw_value(full_client_state_key(&client_id), vec![0xff]);

    let res = query_client_state_with_proof(&chain, &client_id);

    assert!(matches!(res, Err(QueryError::Decoding(_))));
}

/// The consensus state the client holds for `CLIENT_HEIGHT` once it has been
/// rewritten in the block after `CHAIN_HEIGHT`.
fn rewritten_consensus_state() -> MockConsensusState {
    MockConsensusState::new(MockHeader::new(height(CLIENT_HEIGHT)).with_timestamp(999))
}

/// A chain whose client was updated in the block after `CHAIN_HEIGHT`, while
/// its channel queries are still answered from the state at `CHAIN_HEIGHT`.
fn chain_with_updated_client() -> MockChain {
    let client_id = mock_client_id();

    let mut chain = chain_with_channel();
    chain.advance_block();

    chain
        .with_client_state(&client_id, dummy_mock_client_state(height(CLIENT_HEIGHT + 5)))
        .with_consensus_state(&client_id, height(CLIENT_HEIGHT), rewritten_consensus_state())
        .with_lagging_channel_queries(height(CHAIN_HEIGHT))
}

#[rstest]
#[case::proven(IncludeProof::Yes, CLIENT_HEIGHT + 5, CHAIN_HEIGHT + 1)]
#[case::direct(IncludeProof::No, CLIENT_HEIGHT, CHAIN_HEIGHT)]
fn proven_client_state_comes_from_the_store_read(
    #[case] include_proof: IncludeProof,
    #[case] client_height: u64,
    #[case] served_at: u64,
) {
    let (port_id, channel_id) = transfer_channel();
    let chain = chain_with_updated_client();

    let result = query_channel_client_state(&chain, &port_id, &channel_id, include_proof)
        .expect("stored client state");

    let expected = Any::from(dummy_mock_client_state(height(client_height)));
    assert_eq!(result.value.client_id, mock_client_id());
    assert_eq!(result.value.client_state, expected);
    assert_eq!(result.query_height, height(served_at));

    if include_proof.to_bool() {
        let (key, value) = proven_entry(&result);
        assert_eq!(key, full_client_state_key(&mock_client_id()));
        assert_eq!(value, expected.encode_to_vec());
        assert_eq!(result.proof_height(), Some(height(served_at)));
    }
}

#[rstest]
#[case::proven(IncludeProof::Yes, CHAIN_HEIGHT + 1)]
#[case::direct(IncludeProof::No, CHAIN_HEIGHT)]
fn proven_consensus_state_comes_from_the_store_read(
    #[case] include_proof: IncludeProof,
    #[case] served_at: u64,
) {
    let (port_id, channel_id) = transfer_channel();
    let chain = chain_with_updated_client();

    let result = query_channel_consensus_state(
        &chain,
        &port_id,
        &channel_id,
        height(CLIENT_HEIGHT),
        include_proof,
    )
    .expect("stored consensus state");

    let expected = match include_proof {
        IncludeProof::Yes => Any::from(rewritten_consensus_state()),
        IncludeProof::No => Any::from(dummy_mock_consensus_state(height(CLIENT_HEIGHT))),
    };
    assert_eq!(result.value.consensus_state, expected);
    assert_eq!(result.query_height, height(served_at));

    if include_proof.to_bool() {
        let (key, value) = proven_entry(&result);
        assert_eq!(
            key,
            full_consensus_state_key(&mock_client_id(), height(CLIENT_HEIGHT))
        );
        assert_eq!(value, expected.encode_to_vec());
    }
}
