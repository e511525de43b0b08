use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use ibc_proto::ibc::core::channel::v1::{
    Channel as RawChannel, QueryChannelClientStateRequest, QueryChannelClientStateResponse,
    QueryChannelConsensusStateRequest, QueryChannelConsensusStateResponse, QueryChannelRequest,
    QueryChannelResponse, QueryNextSequenceReceiveRequest, QueryNextSequenceReceiveResponse,
    QueryPacketCommitmentRequest, QueryPacketCommitmentResponse,
};
use ibc_proto::ibc::core::client::v1::IdentifiedClientState as RawIdentifiedClientState;
use ibc_proto::ibc::core::commitment::v1::MerkleProof as RawMerkleProof;
use ibc_proto::ics23::commitment_proof::Proof;
use ibc_proto::ics23::{CommitmentProof, ExistenceProof, NonExistenceProof};
use ibc_query_client::context::{ChannelQuery, ProofQuery, QueryContext};
use ibc_query_client::error::TransportError;
use ibc_query_client::types::{QueryHeight, StoreQueryResponse};
use ibc_query_types::channel::ChannelEnd;
use ibc_query_types::codec::ProtoCodec;
use ibc_query_types::commitment::PacketCommitment;
use ibc_query_types::height::Height;
use ibc_query_types::identifiers::{ChainId, ChannelId, ClientId, ConnectionId, PortId, Sequence};
use ibc_query_types::path::{
    full_client_state_key, full_consensus_state_key, key_channel, key_next_sequence_recv,
    key_packet_commitment,
};
use ibc_query_types::proto::{Any, Protobuf};
use prost::Message;
use sha2::{Digest, Sha256};
use tonic::Status;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

use crate::fixtures::clients::mock_codec;

pub const DEFAULT_CHAIN_ID: &str = "mockgaia-0";

/// Name of the store the IBC module keeps its state in.
pub const IBC_STORE_NAME: &[u8] = b"ibc";

type Store = BTreeMap<Vec<u8>, Vec<u8>>;

/// Configuration of a fresh [`MockChain`].
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MockChain))]
pub struct MockChainConfig {
    #[builder(default = ChainId::new(DEFAULT_CHAIN_ID).expect("Never fails"))]
    chain_id: ChainId,
    #[builder(default = Height::new(0, 5).expect("Never fails"))]
    latest_height: Height,
    #[builder(default = mock_codec())]
    codec: ProtoCodec,
}

impl From<MockChainConfig> for MockChain {
    fn from(config: MockChainConfig) -> Self {
        assert_eq!(
            config.chain_id.revision_number(),
            config.latest_height.revision_number(),
            "The latest height must be on the revision of the chain id"
        );

        MockChain {
            chain_id: config.chain_id,
            latest_height: config.latest_height,
            store: Store::new(),
            history: BTreeMap::new(),
            connections: BTreeMap::new(),
            codec: config.codec,
            query_height: QueryHeight::Latest,
            offline: false,
            serve_proofs: true,
            channel_view: None,
        }
    }
}

/// An in-memory chain serving IBC queries.
///
/// Writes go to the store of the latest height. [`MockChain::advance_block`]
/// commits that store as the state of the current height and moves on to the
/// next one, so queries at past heights see the state committed back then.
#[derive(Clone, Debug)]
pub struct MockChain {
    chain_id: ChainId,
    latest_height: Height,
    store: Store,
    history: BTreeMap<Height, Store>,
    connections: BTreeMap<ConnectionId, ClientId>,
    codec: ProtoCodec,
    query_height: QueryHeight,
    offline: bool,
    serve_proofs: bool,
    channel_view: Option<Height>,
}

impl Default for MockChain {
    fn default() -> Self {
        MockChainConfig::builder().build()
    }
}

/// The state of the chain at one height.
struct Snapshot<'a> {
    height: Height,
    store: &'a Store,
}

impl<'a> Snapshot<'a> {
    fn get(&self, key: &[u8]) -> Option<&'a Vec<u8>> {
        self.store.get(key)
    }

    /// Hash over every key-value pair, standing in for the IBC store root.
    fn root(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();

        for (key, value) in self.store {
            hasher.update((key.len() as u64).to_be_bytes());
            hasher.update(key);
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value);
        }

        hasher.finalize().to_vec()
    }

    /// Encoded `MerkleProof` with one proof for `key` in the IBC store and
    /// one for the IBC store root in the multistore, as a Cosmos SDK node
    /// returns them.
    fn proof(&self, key: &[u8]) -> Vec<u8> {
        let store_proof = match self.get(key) {
            Some(value) => Proof::Exist(ExistenceProof {
                key: key.to_vec(),
                value: value.clone(),
                leaf: None,
                path: vec![],
            }),
            None => Proof::Nonexist(NonExistenceProof {
                key: key.to_vec(),
                left: None,
                right: None,
            }),
        };

        let root_proof = Proof::Exist(ExistenceProof {
            key: IBC_STORE_NAME.to_vec(),
            value: self.root(),
            leaf: None,
            path: vec![],
        });

        RawMerkleProof {
            proofs: vec![
                CommitmentProof {
                    proof: Some(store_proof),
                },
                CommitmentProof {
                    proof: Some(root_proof),
                },
            ],
        }
        .encode_to_vec()
    }
}

impl MockChain {
    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn latest_height(&self) -> Height {
        self.latest_height
    }

    pub fn with_client_state(self, client_id: &ClientId, client_state: impl Into<Any>) -> Self {
        let value = client_state.into().encode_to_vec();
        self.with_raw_value(full_client_state_key(client_id), value)
    }

    pub fn with_consensus_state(
        self,
        client_id: &ClientId,
        height: Height,
        consensus_state: impl Into<Any>,
    ) -> Self {
        let value = consensus_state.into().encode_to_vec();
        self.with_raw_value(full_consensus_state_key(client_id, height), value)
    }

    /// Records that `connection_id` is built on `client_id`.
    pub fn with_connection(mut self, connection_id: ConnectionId, client_id: ClientId) -> Self {
        self.connections.insert(connection_id, client_id);
        self
    }

    pub fn with_channel(
        self,
        port_id: &PortId,
        channel_id: &ChannelId,
        channel_end: ChannelEnd,
    ) -> Self {
        self.with_raw_value(key_channel(port_id, channel_id), channel_end.encode_vec())
    }

    pub fn with_packet_commitment(
        self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        commitment: PacketCommitment,
    ) -> Self {
        self.with_raw_value(
            key_packet_commitment(port_id, channel_id, sequence),
            commitment.into_vec(),
        )
    }

    pub fn with_recv_sequence(
        self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Self {
        self.with_raw_value(key_next_sequence_recv(port_id, channel_id), sequence.to_vec())
    }

    /// Stores `value` under `key` as is. Lets tests plant malformed values.
    pub fn with_raw_value(mut self, key: Vec<u8>, value: Vec<u8>) -> Self {
        trace!(
            "writing {} bytes at `{}`",
            value.len(),
            String::from_utf8_lossy(&key)
        );
        self.store.insert(key, value);
        self
    }

    /// Serves every query issued through this chain's [`QueryContext`] at
    /// `height`.
    pub fn at_height(mut self, height: QueryHeight) -> Self {
        self.query_height = height;
        self
    }

    /// Fails every subsequent query as an unreachable node would.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Answers store queries without a proof.
    pub fn without_proofs(mut self) -> Self {
        self.serve_proofs = false;
        self
    }

    /// Serves the channel client and consensus state queries from the state
    /// committed at `height`, whatever height they ask for. Store reads are
    /// unaffected.
    pub fn with_lagging_channel_queries(mut self, height: Height) -> Self {
        self.channel_view = Some(height);
        self
    }

    /// The height channel client and consensus state queries are served at.
    fn channel_query_height(&self, requested: QueryHeight) -> QueryHeight {
        self.channel_view.map_or(requested, QueryHeight::Specific)
    }

    /// Commits the current state at the latest height and starts the next
    /// block.
    pub fn advance_block(&mut self) {
        self.history.insert(self.latest_height, self.store.clone());
        self.latest_height = self.latest_height.increment();

        debug!("{} advanced to {}", self.chain_id, self.latest_height);
    }

    pub fn advance_block_up_to(mut self, target_height: Height) -> Self {
        assert_eq!(
            self.latest_height.revision_number(),
            target_height.revision_number(),
            "Cannot advance the chain to a different revision number!"
        );

        while self.latest_height < target_height {
            self.advance_block();
        }

        self
    }

    fn snapshot(&self, height: QueryHeight) -> Result<Snapshot<'_>, TransportError> {
        if self.offline {
            return Err(Status::unavailable(format!("{} is offline", self.chain_id)).into());
        }

        match height {
            QueryHeight::Latest => Ok(Snapshot {
                height: self.latest_height,
                store: &self.store,
            }),
            QueryHeight::Specific(height) if height == self.latest_height => Ok(Snapshot {
                height,
                store: &self.store,
            }),
            QueryHeight::Specific(height) => {
                let store =
                    self.history
                        .get(&height)
                        .ok_or_else(|| TransportError::InvalidQueryHeight {
                            height,
                            reason: format!(
                                "no state committed, latest height is {}",
                                self.latest_height
                            ),
                        })?;

                Ok(Snapshot { height, store })
            }
        }
    }

    fn proof_or_empty(&self, snapshot: &Snapshot<'_>, key: &[u8]) -> Vec<u8> {
        if self.serve_proofs {
            snapshot.proof(key)
        } else {
            Vec::new()
        }
    }

    /// Resolves the client the channel's first connection hop is built on.
    fn channel_client(
        &self,
        snapshot: &Snapshot<'_>,
        port_id: &str,
        channel_id: &str,
    ) -> Result<ClientId, TransportError> {
        let port_id: PortId = parse_id(port_id)?;
        let channel_id: ChannelId = parse_id(channel_id)?;

        let value = snapshot
            .get(&key_channel(&port_id, &channel_id))
            .ok_or_else(|| Status::not_found(format!("channel {port_id}/{channel_id}")))?;

        let channel_end =
            ChannelEnd::decode_vec(value).map_err(|e| Status::internal(e.to_string()))?;

        let connection_id = channel_end.connection_id().ok_or_else(|| {
            Status::failed_precondition(format!(
                "channel {port_id}/{channel_id} has no connection hops"
            ))
        })?;

        let client_id = self
            .connections
            .get(connection_id)
            .ok_or_else(|| Status::not_found(format!("connection {connection_id}")))?;

        Ok(client_id.clone())
    }
}

fn parse_id<T>(id: &str) -> Result<T, Status>
where
    T: FromStr,
    T::Err: Display,
{
    id.parse()
        .map_err(|e| Status::invalid_argument(format!("`{id}`: {e}")))
}

fn decode_any(value: &[u8]) -> Result<Any, Status> {
    Any::decode(value).map_err(|e| Status::internal(e.to_string()))
}

impl ProofQuery for MockChain {
    fn query_proof(
        &self,
        key: &[u8],
        height: QueryHeight,
    ) -> Result<StoreQueryResponse, TransportError> {
        let snapshot = self.snapshot(height)?;

        let value = snapshot.get(key).cloned().unwrap_or_default();

        Ok(StoreQueryResponse {
            value,
            proof: self.proof_or_empty(&snapshot, key),
            proof_height: snapshot.height,
        })
    }
}

impl ChannelQuery for MockChain {
    fn channel(
        &self,
        request: QueryChannelRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelResponse, TransportError> {
        let snapshot = self.snapshot(height)?;

        let port_id: PortId = parse_id(&request.port_id)?;
        let channel_id: ChannelId = parse_id(&request.channel_id)?;
        let key = key_channel(&port_id, &channel_id);

        let value = snapshot
            .get(&key)
            .ok_or_else(|| Status::not_found(format!("channel {port_id}/{channel_id}")))?;

        let channel =
            RawChannel::decode(value.as_slice()).map_err(|e| Status::internal(e.to_string()))?;

        Ok(QueryChannelResponse {
            channel: Some(channel),
            proof: self.proof_or_empty(&snapshot, &key),
            proof_height: Some(snapshot.height.into()),
        })
    }

    fn packet_commitment(
        &self,
        request: QueryPacketCommitmentRequest,
        height: QueryHeight,
    ) -> Result<QueryPacketCommitmentResponse, TransportError> {
        let snapshot = self.snapshot(height)?;

        let port_id: PortId = parse_id(&request.port_id)?;
        let channel_id: ChannelId = parse_id(&request.channel_id)?;
        let sequence = Sequence::from(request.sequence);
        let key = key_packet_commitment(&port_id, &channel_id, sequence);

        let commitment = snapshot.get(&key).ok_or_else(|| {
            Status::not_found(format!(
                "packet commitment {port_id}/{channel_id}/{sequence}"
            ))
        })?;

        Ok(QueryPacketCommitmentResponse {
            commitment: commitment.clone(),
            proof: self.proof_or_empty(&snapshot, &key),
            proof_height: Some(snapshot.height.into()),
        })
    }

    fn next_sequence_receive(
        &self,
        request: QueryNextSequenceReceiveRequest,
        height: QueryHeight,
    ) -> Result<QueryNextSequenceReceiveResponse, TransportError> {
        let snapshot = self.snapshot(height)?;

        let port_id: PortId = parse_id(&request.port_id)?;
        let channel_id: ChannelId = parse_id(&request.channel_id)?;
        let key = key_next_sequence_recv(&port_id, &channel_id);

        let value = snapshot.get(&key).ok_or_else(|| {
            Status::not_found(format!("next sequence receive of {port_id}/{channel_id}"))
        })?;

        let sequence =
            Sequence::from_be_slice(value).map_err(|e| Status::internal(e.to_string()))?;

        Ok(QueryNextSequenceReceiveResponse {
            next_sequence_receive: sequence.value(),
            proof: self.proof_or_empty(&snapshot, &key),
            proof_height: Some(snapshot.height.into()),
        })
    }

    fn channel_client_state(
        &self,
        request: QueryChannelClientStateRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelClientStateResponse, TransportError> {
        let snapshot = self.snapshot(self.channel_query_height(height))?;

        let client_id = self.channel_client(&snapshot, &request.port_id, &request.channel_id)?;
        let key = full_client_state_key(&client_id);

        let value = snapshot
            .get(&key)
            .ok_or_else(|| Status::not_found(format!("client state of {client_id}")))?;

        Ok(QueryChannelClientStateResponse {
            identified_client_state: Some(RawIdentifiedClientState {
                client_id: client_id.to_string(),
                client_state: Some(decode_any(value)?),
            }),
            proof: self.proof_or_empty(&snapshot, &key),
            proof_height: Some(snapshot.height.into()),
        })
    }

    fn channel_consensus_state(
        &self,
        request: QueryChannelConsensusStateRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelConsensusStateResponse, TransportError> {
        let snapshot = self.snapshot(self.channel_query_height(height))?;

        let client_id = self.channel_client(&snapshot, &request.port_id, &request.channel_id)?;
        let consensus_height = Height::new(request.revision_number, request.revision_height)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;
        let key = full_consensus_state_key(&client_id, consensus_height);

        let value = snapshot.get(&key).ok_or_else(|| {
            Status::not_found(format!(
                "consensus state of {client_id} at {consensus_height}"
            ))
        })?;

        Ok(QueryChannelConsensusStateResponse {
            consensus_state: Some(decode_any(value)?),
            client_id: client_id.to_string(),
            proof: self.proof_or_empty(&snapshot, &key),
            proof_height: Some(snapshot.height.into()),
        })
    }
}

impl QueryContext for MockChain {
    fn codec(&self) -> &ProtoCodec {
        &self.codec
    }

    fn query_height(&self) -> QueryHeight {
        self.query_height
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::fixtures::channel::dummy_channel_end;

    fn height(revision_height: u64) -> Height {
        Height::new(0, revision_height).expect("valid height")
    }

    fn decode_proof(bytes: &[u8]) -> RawMerkleProof {
        RawMerkleProof::decode(bytes).expect("valid merkle proof")
    }

    #[test_log::test]
    fn proofs_cover_the_key_and_the_store_root() {
        let chain = MockChain::default().with_raw_value(b"some/key".to_vec(), vec![1, 2]);

        let present = chain
            .query_proof(b"some/key", QueryHeight::Latest)
            .expect("served");
        let absent = chain
            .query_proof(b"other/key", QueryHeight::Latest)
            .expect("served");

        assert_eq!(present.value, vec![1, 2]);
        assert_eq!(present.proof_height, chain.latest_height());
        assert!(absent.value.is_empty());

        let present_proof = decode_proof(&present.proof);
        let absent_proof = decode_proof(&absent.proof);

        assert!(matches!(
            present_proof.proofs[0].proof,
            Some(Proof::Exist(_))
        ));
        assert!(matches!(
            absent_proof.proofs[0].proof,
            Some(Proof::Nonexist(_))
        ));
        assert_eq!(present_proof.proofs[1], absent_proof.proofs[1]);
    }

    #[test_log::test]
    fn root_changes_with_every_write() {
        let chain = MockChain::default();
        let before = decode_proof(
            &chain
                .query_proof(b"key", QueryHeight::Latest)
                .expect("served")
                .proof,
        );

        let chain = chain.with_raw_value(b"key".to_vec(), vec![7]);
        let after = decode_proof(
            &chain
                .query_proof(b"key", QueryHeight::Latest)
                .expect("served")
                .proof,
        );

        assert_ne!(before.proofs[1], after.proofs[1]);
    }

    #[rstest]
    #[case(5, 5)]
    #[case(5, 9)]
    fn advance_block_up_to(#[case] start: u64, #[case] target: u64) {
        let chain = MockChainConfig::builder()
            .latest_height(height(start))
            .build()
            .advance_block_up_to(height(target));

        assert_eq!(chain.latest_height(), height(target));
    }

    #[test_log::test]
    fn past_heights_keep_their_state() {
        let mut chain = MockChain::default().with_raw_value(b"key".to_vec(), vec![1]);
        let committed_at = chain.latest_height();

        chain.advance_block();
        let chain = chain.with_raw_value(b"key".to_vec(), vec![2]);

        let past = chain
            .query_proof(b"key", QueryHeight::Specific(committed_at))
            .expect("committed height");
        let latest = chain
            .query_proof(b"key", QueryHeight::Latest)
            .expect("latest height");

        assert_eq!(past.value, vec![1]);
        assert_eq!(past.proof_height, committed_at);
        assert_eq!(latest.value, vec![2]);
        assert_eq!(latest.proof_height, committed_at.increment());
    }

    #[rstest]
    #[case::before_genesis(1)]
    #[case::in_the_future(100)]
    fn uncommitted_heights_are_rejected(#[case] revision_height: u64) {
        let chain = MockChain::default();

        let res = chain.query_proof(b"key", QueryHeight::Specific(height(revision_height)));

        assert!(matches!(
            res,
            Err(TransportError::InvalidQueryHeight { .. })
        ));
    }

    #[test_log::test]
    fn channel_client_follows_the_first_connection_hop() {
        let port_id = PortId::transfer();
        let channel_id = ChannelId::zero();
        let client_id = ClientId::new("07-tendermint", 3).expect("valid client id");

        let chain = MockChain::default()
            .with_connection(ConnectionId::zero(), client_id.clone())
            .with_channel(&port_id, &channel_id, dummy_channel_end());

        let snapshot = chain.snapshot(QueryHeight::Latest).expect("served");

        assert_eq!(
            chain
                .channel_client(&snapshot, port_id.as_str(), channel_id.as_str())
                .expect("known connection"),
            client_id
        );
    }

    #[test_log::test]
    fn unknown_connection_is_not_found() {
        let chain = MockChain::default().with_channel(
            &PortId::transfer(),
            &ChannelId::zero(),
            dummy_channel_end(),
        );

        let res = chain.channel_client_state(
            QueryChannelClientStateRequest {
                port_id: "transfer".to_string(),
                channel_id: "channel-0".to_string(),
            },
            QueryHeight::Latest,
        );

        match res {
            Err(TransportError::Grpc(status)) => assert_eq!(status.code(), tonic::Code::NotFound),
            other => panic!("expected a not found status, got {other:?}"),
        }
    }

    #[test_log::test]
    fn proofs_can_be_withheld() {
        let chain = MockChain::default()
            .with_raw_value(b"key".to_vec(), vec![1])
            .without_proofs();

        let response = chain
            .query_proof(b"key", QueryHeight::Latest)
            .expect("served");

        assert_eq!(response.value, vec![1]);
        assert!(response.proof.is_empty());
    }
}
