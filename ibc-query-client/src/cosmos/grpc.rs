//! Direct channel queries over the IBC channel gRPC query service.

use std::sync::Arc;

use ibc_proto::ibc::core::channel::v1::query_client::QueryClient as IbcChannelQueryClient;
use ibc_proto::ibc::core::channel::v1::{
    QueryChannelClientStateRequest, QueryChannelClientStateResponse,
    QueryChannelConsensusStateRequest, QueryChannelConsensusStateResponse, QueryChannelRequest,
    QueryChannelResponse, QueryNextSequenceReceiveRequest, QueryNextSequenceReceiveResponse,
    QueryPacketCommitmentRequest, QueryPacketCommitmentResponse,
};
use tendermint_rpc::Url;
use tokio::runtime::Runtime as TokioRuntime;
use tonic::metadata::MetadataValue;
use tonic::transport::Channel;

use crate::context::ChannelQuery;
use crate::error::TransportError;
use crate::types::QueryHeight;

/// Request metadata key that pins a Cosmos SDK gRPC query to a block height.
pub const BLOCK_HEIGHT_METADATA_KEY: &str = "x-cosmos-block-height";

#[derive(Clone)]
pub struct GrpcChannelQuery {
    client: IbcChannelQueryClient<Channel>,
    rt: Arc<TokioRuntime>,
}

impl GrpcChannelQuery {
    pub fn connect(grpc_addr: &Url, rt: Arc<TokioRuntime>) -> Result<Self, TransportError> {
        let client = rt.block_on(IbcChannelQueryClient::connect(grpc_addr.to_string()))?;

        Ok(Self { client, rt })
    }
}

/// Wraps `message` into a request served at `height`.
pub(crate) fn request_at<T>(message: T, height: QueryHeight) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);

    if let QueryHeight::Specific(height) = height {
        request.metadata_mut().insert(
            BLOCK_HEIGHT_METADATA_KEY,
            MetadataValue::from(height.revision_height()),
        );
    }

    request
}

impl ChannelQuery for GrpcChannelQuery {
    fn channel(
        &self,
        request: QueryChannelRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelResponse, TransportError> {
        let mut client = self.client.clone();

        let response = self
            .rt
            .block_on(client.channel(request_at(request, height)))?
            .into_inner();

        Ok(response)
    }

    fn packet_commitment(
        &self,
        request: QueryPacketCommitmentRequest,
        height: QueryHeight,
    ) -> Result<QueryPacketCommitmentResponse, TransportError> {
        let mut client = self.client.clone();

        let response = self
            .rt
            .block_on(client.packet_commitment(request_at(request, height)))?
            .into_inner();

        Ok(response)
    }

    fn next_sequence_receive(
        &self,
        request: QueryNextSequenceReceiveRequest,
        height: QueryHeight,
    ) -> Result<QueryNextSequenceReceiveResponse, TransportError> {
        let mut client = self.client.clone();

        let response = self
            .rt
            .block_on(client.next_sequence_receive(request_at(request, height)))?
            .into_inner();

        Ok(response)
    }

    fn channel_client_state(
        &self,
        request: QueryChannelClientStateRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelClientStateResponse, TransportError> {
        let mut client = self.client.clone();

        let response = self
            .rt
            .block_on(client.channel_client_state(request_at(request, height)))?
            .into_inner();

        Ok(response)
    }

    fn channel_consensus_state(
        &self,
        request: QueryChannelConsensusStateRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelConsensusStateResponse, TransportError> {
        let mut client = self.client.clone();

        let response = self
            .rt
            .block_on(client.channel_consensus_state(request_at(request, height)))?
            .into_inner();

        Ok(response)
    }
}
