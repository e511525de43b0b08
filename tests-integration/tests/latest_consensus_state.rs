mod common;

use common::{
    chain_with_channel, height, mock_client_id, transfer_channel, CHAIN_HEIGHT, CLIENT_HEIGHT,
};
use ibc_query_client::core::channel::query_latest_consensus_state;
use ibc_query_client::error::QueryError;
use ibc_query_client::types::QueryHeight;
use ibc_query_testkit::chain::{MockChain, MockChainConfig};
use ibc_query_testkit::fixtures::channel::dummy_channel_end;
use ibc_query_testkit::fixtures::clients::{
    dummy_mock_client_state, dummy_mock_consensus_state, dummy_sm_client_state,
    dummy_tm_client_state, dummy_tm_consensus_state,
};
use ibc_query_types::client::solomachine::SOLOMACHINE_CLIENT_TYPE;
use ibc_query_types::client::tendermint::TENDERMINT_CLIENT_TYPE;
use ibc_query_types::client::AnyConsensusState;
use ibc_query_types::codec::{ProtoCodec, UnpackError};
use ibc_query_types::height::Height;
use ibc_query_types::identifiers::{ChainId, ClientId, ConnectionId};
use rstest::rstest;

/// A chain whose `transfer/channel-0` is built on `client_id`.
fn chain_with_client(client_id: &ClientId) -> MockChain {
    let (port_id, channel_id) = transfer_channel();

    MockChainConfig::builder()
        .latest_height(height(CHAIN_HEIGHT))
        .build()
        .with_connection(ConnectionId::zero(), client_id.clone())
        .with_channel(&port_id, &channel_id, dummy_channel_end())
}

#[test_log::test]
fn client_height_and_proof_height_are_kept_apart() {
    let (port_id, channel_id) = transfer_channel();
    let chain = chain_with_channel();

    let latest = query_latest_consensus_state(&chain, &port_id, &channel_id)
        .expect("stored consensus state");

    assert_eq!(latest.client_height, height(CLIENT_HEIGHT));
    assert_eq!(latest.proof_height, height(CHAIN_HEIGHT));
    assert_ne!(latest.client_height, latest.proof_height);
    assert_eq!(
        latest.consensus_state,
        AnyConsensusState::Mock(dummy_mock_consensus_state(height(CLIENT_HEIGHT)))
    );
}

#[rstest]
#[case(26)]
#[case(28)]
#[case(30)]
fn proof_height_follows_the_served_height(#[case] served_at: u64) {
    let (port_id, channel_id) = transfer_channel();
    let chain = chain_with_channel()
        .advance_block_up_to(height(30))
        .at_height(QueryHeight::Specific(height(served_at)));

    let latest = query_latest_consensus_state(&chain, &port_id, &channel_id)
        .expect("stored consensus state");

    assert_eq!(latest.client_height, height(CLIENT_HEIGHT));
    assert_eq!(latest.proof_height, height(served_at));
}

#[test_log::test]
fn client_updated_to_a_later_height() {
    let (port_id, channel_id) = transfer_channel();
    let client_id = mock_client_id();
    let updated = height(CLIENT_HEIGHT + 5);

    let chain = chain_with_channel()
        .with_client_state(&client_id, dummy_mock_client_state(updated))
        .with_consensus_state(&client_id, updated, dummy_mock_consensus_state(updated));

    let latest = query_latest_consensus_state(&chain, &port_id, &channel_id)
        .expect("stored consensus state");

    assert_eq!(latest.client_height, updated);
    assert_eq!(
        latest.consensus_state,
        AnyConsensusState::Mock(dummy_mock_consensus_state(updated))
    );
}

#[test_log::test]
fn solo_machine_client_is_a_height_type_mismatch() {
    let (port_id, channel_id) = transfer_channel();
    let client_id = ClientId::new(SOLOMACHINE_CLIENT_TYPE, 0).expect("Never fails");

    let chain = chain_with_client(&client_id).with_client_state(&client_id, dummy_sm_client_state(12));

    let err = query_latest_consensus_state(&chain, &port_id, &channel_id)
        .expect_err("solo machines report a sequence");

    match err {
        QueryError::HeightTypeMismatch { expected, actual } => {
            assert_eq!(expected, "Height");
            assert_eq!(actual, "Sequence");
        }
        other => panic!("expected a height type mismatch, got {other}"),
    }
}

#[test_log::test]
fn unregistered_client_type_fails_to_unpack() {
    let (port_id, channel_id) = transfer_channel();
    let client_id = mock_client_id();

    let chain = MockChainConfig::builder()
        .latest_height(height(CHAIN_HEIGHT))
        .codec(ProtoCodec::default())
        .build()
        .with_connection(ConnectionId::zero(), client_id.clone())
        .with_channel(&port_id, &channel_id, dummy_channel_end())
        .with_client_state(&client_id, dummy_mock_client_state(height(CLIENT_HEIGHT)));

    let err = query_latest_consensus_state(&chain, &port_id, &channel_id)
        .expect_err("the default codec does not know the mock client");

    assert!(matches!(
        err,
        QueryError::Unpack(UnpackError::UnregisteredTypeUrl { .. })
    ));
}

#[test_log::test]
fn missing_consensus_state_is_surfaced() {
    let (port_id, channel_id) = transfer_channel();
    let client_id = mock_client_id();

    let chain = chain_with_client(&client_id)
        .with_client_state(&client_id, dummy_mock_client_state(height(CLIENT_HEIGHT)));

    let err = query_latest_consensus_state(&chain, &port_id, &channel_id)
        .expect_err("no consensus state at the client height");

    assert!(matches!(err, QueryError::Transport(_)));
}

#[test_log::test]
fn tendermint_client_on_another_revision() {
    let (port_id, channel_id) = transfer_channel();
    let client_id = ClientId::new(TENDERMINT_CLIENT_TYPE, 0).expect("Never fails");
    let counterparty = ChainId::new("counterparty-1").expect("Never fails");
    let client_height = Height::new(1, 20).expect("Never fails");

    let chain = chain_with_client(&client_id)
        .with_client_state(
            &client_id,
            dummy_tm_client_state(counterparty.clone(), client_height),
        )
        .with_consensus_state(
            &client_id,
            client_height,
            dummy_tm_consensus_state(&counterparty, client_height),
        );

    let latest = query_latest_consensus_state(&chain, &port_id, &channel_id)
        .expect("stored consensus state");

    assert_eq!(latest.client_height, client_height);
    assert_eq!(latest.proof_height, height(CHAIN_HEIGHT));
    assert!(matches!(
        latest.consensus_state,
        AnyConsensusState::Tendermint(_)
    ));
}
