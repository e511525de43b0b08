//! A [`QueryContext`] backed by a Cosmos SDK node.
//!
//! Store reads with proofs go through the Tendermint RPC `abci_query`
//! endpoint, direct queries through the IBC channel gRPC service. Both are
//! asynchronous clients driven by a runtime the context owns, so the query
//! functions stay synchronous.

mod config;
mod grpc;
mod merkle;
mod rpc;

use std::sync::Arc;

pub use config::QueryConfig;
pub use grpc::{GrpcChannelQuery, BLOCK_HEIGHT_METADATA_KEY};
use ibc_proto::ibc::core::channel::v1::{
    QueryChannelClientStateRequest, QueryChannelClientStateResponse,
    QueryChannelConsensusStateRequest, QueryChannelConsensusStateResponse, QueryChannelRequest,
    QueryChannelResponse, QueryNextSequenceReceiveRequest, QueryNextSequenceReceiveResponse,
    QueryPacketCommitmentRequest, QueryPacketCommitmentResponse,
};
use ibc_query_types::codec::ProtoCodec;
pub use merkle::convert_tm_to_ics_merkle_proof;
pub use rpc::{TendermintProofQuery, IBC_QUERY_PATH};
use tokio::runtime::{Builder, Runtime as TokioRuntime};
use tracing::debug;

use crate::context::{ChannelQuery, ProofQuery, QueryContext};
use crate::error::TransportError;
use crate::types::{QueryHeight, StoreQueryResponse};

pub struct CosmosQueryContext {
    config: QueryConfig,
    codec: ProtoCodec,
    proof_query: TendermintProofQuery,
    channel_query: GrpcChannelQuery,
}

impl CosmosQueryContext {
    /// Connects to the node's gRPC endpoint and sets up the RPC client.
    pub fn new(config: QueryConfig, codec: ProtoCodec) -> Result<Self, TransportError> {
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TransportError::Other(Box::new(e)))?;

        Self::with_runtime(config, codec, Arc::new(rt))
    }

    /// Same as [`CosmosQueryContext::new`], driving the transports on a
    /// runtime shared with the caller.
    pub fn with_runtime(
        config: QueryConfig,
        codec: ProtoCodec,
        rt: Arc<TokioRuntime>,
    ) -> Result<Self, TransportError> {
        debug!(
            "connecting to chain {} (rpc: {}, grpc: {})",
            config.chain_id, config.rpc_addr, config.grpc_addr
        );

        let proof_query =
            TendermintProofQuery::new(config.chain_id.clone(), config.rpc_addr.clone(), rt.clone())?;
        let channel_query = GrpcChannelQuery::connect(&config.grpc_addr, rt)?;

        Ok(Self {
            config,
            codec,
            proof_query,
            channel_query,
        })
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Pins every subsequent query to `height`.
    pub fn at_height(mut self, height: QueryHeight) -> Self {
        self.config.height = height;
        self
    }
}

impl ProofQuery for CosmosQueryContext {
    fn query_proof(
        &self,
        key: &[u8],
        height: QueryHeight,
    ) -> Result<StoreQueryResponse, TransportError> {
        self.proof_query.query_proof(key, height)
    }
}

impl ChannelQuery for CosmosQueryContext {
    fn channel(
        &self,
        request: QueryChannelRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelResponse, TransportError> {
        self.channel_query.channel(request, height)
    }

    fn packet_commitment(
        &self,
        request: QueryPacketCommitmentRequest,
        height: QueryHeight,
    ) -> Result<QueryPacketCommitmentResponse, TransportError> {
        self.channel_query.packet_commitment(request, height)
    }

    fn next_sequence_receive(
        &self,
        request: QueryNextSequenceReceiveRequest,
        height: QueryHeight,
    ) -> Result<QueryNextSequenceReceiveResponse, TransportError> {
        self.channel_query.next_sequence_receive(request, height)
    }

    fn channel_client_state(
        &self,
        request: QueryChannelClientStateRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelClientStateResponse, TransportError> {
        self.channel_query.channel_client_state(request, height)
    }

    fn channel_consensus_state(
        &self,
        request: QueryChannelConsensusStateRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelConsensusStateResponse, TransportError> {
        self.channel_query.channel_consensus_state(request, height)
    }
}

impl QueryContext for CosmosQueryContext {
    fn codec(&self) -> &ProtoCodec {
        &self.codec
    }

    fn query_height(&self) -> QueryHeight {
        self.config.height
    }
}
