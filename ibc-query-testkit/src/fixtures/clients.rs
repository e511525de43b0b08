use core::time::Duration;

use ibc_query_types::client::mock::proto::{
    ClientState as RawMockClientState, ConsensusState as RawMockConsensusState,
};
use ibc_query_types::client::mock::{
    MockClientState, MockConsensusState, MockHeader, MOCK_CLIENT_STATE_TYPE_URL,
    MOCK_CONSENSUS_STATE_TYPE_URL,
};
use ibc_query_types::client::solomachine::{SmClientState, SmConsensusState};
use ibc_query_types::client::tendermint::{TmClientState, TmConsensusState};
use ibc_query_types::codec::{
    decode_client_state, decode_consensus_state, InterfaceRegistry, ProtoCodec,
};
use ibc_query_types::height::Height;
use ibc_query_types::identifiers::ChainId;
use ibc_query_types::proto::Any;
use ibc_query_types::staking::ConsensusPubKey;
use tendermint_testgen::{Generator, Header as TestgenHeader, Validator as TestgenValidator};

/// The default registry extended with the mock light client.
pub fn mock_registry() -> InterfaceRegistry {
    InterfaceRegistry::default()
        .with_client_state(
            MOCK_CLIENT_STATE_TYPE_URL,
            decode_client_state::<MockClientState, RawMockClientState>,
        )
        .with_consensus_state(
            MOCK_CONSENSUS_STATE_TYPE_URL,
            decode_consensus_state::<MockConsensusState, RawMockConsensusState>,
        )
}

pub fn mock_codec() -> ProtoCodec {
    ProtoCodec::new(mock_registry())
}

pub fn dummy_mock_client_state(latest_height: Height) -> MockClientState {
    MockClientState::new(MockHeader::new(latest_height))
}

pub fn dummy_mock_consensus_state(height: Height) -> MockConsensusState {
    MockConsensusState::new(MockHeader::new(height).with_timestamp(height.revision_height()))
}

/// Returns a dummy Tendermint client state, for testing purposes only!
pub fn dummy_tm_client_state(chain_id: ChainId, latest_height: Height) -> TmClientState {
    TmClientState::new(
        chain_id,
        latest_height,
        Duration::from_secs(64000),
        Duration::from_secs(128000),
    )
}

/// Returns the consensus state of a generated Tendermint header at `height`,
/// for testing purposes only!
pub fn dummy_tm_consensus_state(chain_id: &ChainId, height: Height) -> TmConsensusState {
    let validators = [
        TestgenValidator::new("1").voting_power(50),
        TestgenValidator::new("2").voting_power(50),
    ];

    let header = TestgenHeader::new(&validators)
        .height(height.revision_height())
        .chain_id(chain_id.as_str())
        .next_validators(&validators)
        .generate()
        .expect("Never fails");

    header.into()
}

/// Returns a dummy solo machine client state at `sequence`, for testing
/// purposes only!
pub fn dummy_sm_client_state(sequence: u64) -> SmClientState {
    let info = TestgenValidator::new("solo")
        .generate()
        .expect("Never fails");

    SmClientState::new(
        sequence,
        SmConsensusState {
            public_key: Any::try_from(ConsensusPubKey(info.pub_key)).expect("Never fails"),
            diversifier: "solo".to_string(),
            timestamp: 1,
        },
    )
}
