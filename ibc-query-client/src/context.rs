//! Collaborators the query functions in [`core`](crate::core) are written
//! against.

use ibc_proto::ibc::core::channel::v1::{
    QueryChannelClientStateRequest, QueryChannelClientStateResponse,
    QueryChannelConsensusStateRequest, QueryChannelConsensusStateResponse, QueryChannelRequest,
    QueryChannelResponse, QueryNextSequenceReceiveRequest, QueryNextSequenceReceiveResponse,
    QueryPacketCommitmentRequest, QueryPacketCommitmentResponse,
};
use ibc_query_types::codec::ProtoCodec;

use crate::error::TransportError;
use crate::types::{QueryHeight, StoreQueryResponse};

/// Reads raw values from the chain's IBC store together with a Merkle proof.
pub trait ProofQuery {
    /// Returns the value stored under `key`, its proof and the height the
    /// proof verifies at. An absent key yields an empty value, not an error.
    fn query_proof(
        &self,
        key: &[u8],
        height: QueryHeight,
    ) -> Result<StoreQueryResponse, TransportError>;
}

/// Direct, unproven channel queries as served by the `ibc.core.channel.v1.Query`
/// gRPC service.
pub trait ChannelQuery {
    fn channel(
        &self,
        request: QueryChannelRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelResponse, TransportError>;

    fn packet_commitment(
        &self,
        request: QueryPacketCommitmentRequest,
        height: QueryHeight,
    ) -> Result<QueryPacketCommitmentResponse, TransportError>;

    fn next_sequence_receive(
        &self,
        request: QueryNextSequenceReceiveRequest,
        height: QueryHeight,
    ) -> Result<QueryNextSequenceReceiveResponse, TransportError>;

    /// Returns the client state of the client the channel's connection is
    /// built on.
    fn channel_client_state(
        &self,
        request: QueryChannelClientStateRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelClientStateResponse, TransportError>;

    fn channel_consensus_state(
        &self,
        request: QueryChannelConsensusStateRequest,
        height: QueryHeight,
    ) -> Result<QueryChannelConsensusStateResponse, TransportError>;
}

/// Everything a query needs: both transports, the codec used to unpack
/// polymorphic payloads and the height queries are served at.
pub trait QueryContext: ProofQuery + ChannelQuery {
    fn codec(&self) -> &ProtoCodec;

    /// Height every query issued through this context is pinned to.
    fn query_height(&self) -> QueryHeight {
        QueryHeight::Latest
    }
}
