//! Provides the dual-mode channel queries.
//!
//! With [`IncludeProof::No`] the node is asked through the channel query
//! service and its answer is normalized. With [`IncludeProof::Yes`] the raw
//! value is read from the resource's ICS-24 store key together with a proof.

use ibc_proto::ibc::core::channel::v1::{
    QueryChannelClientStateRequest, QueryChannelConsensusStateRequest, QueryChannelRequest,
    QueryNextSequenceReceiveRequest, QueryPacketCommitmentRequest,
};
use ibc_query_types::channel::ChannelEnd;
use ibc_query_types::client::{IdentifiedClientState, IdentifiedConsensusState};
use ibc_query_types::commitment::PacketCommitment;
use ibc_query_types::error::DecodingError;
use ibc_query_types::height::Height;
use ibc_query_types::identifiers::{ChannelId, ClientId, PortId, Sequence};
use ibc_query_types::path::{key_channel, key_next_sequence_recv, key_packet_commitment};
use ibc_query_types::proto::Protobuf;
use tracing::{debug, warn};

use crate::context::QueryContext;
use crate::core::client::{query_client_state_with_proof, query_consensus_state_with_proof};
use crate::core::{query_store, served_height};
use crate::error::{MissingResource, QueryError};
use crate::types::{IncludeProof, LatestConsensusState, QueryResult};

/// Queries the channel end identified by the given port and channel ids.
pub fn query_channel<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
    include_proof: IncludeProof,
) -> Result<QueryResult<ChannelEnd>, QueryError>
where
    Ctx: QueryContext,
{
    match include_proof {
        IncludeProof::No => {
            debug!("querying channel end {port_id}/{channel_id} directly");

            let request = QueryChannelRequest {
                port_id: port_id.to_string(),
                channel_id: channel_id.to_string(),
            };

            let response = ctx.channel(request, ctx.query_height())?;

            let channel_end: ChannelEnd = response
                .channel
                .ok_or_else(|| QueryError::missing_field("channel"))?
                .try_into()?;

            Ok(QueryResult::unproven(
                channel_end,
                served_height(response.proof_height)?,
            ))
        }
        IncludeProof::Yes => {
            let result = query_store(ctx, key_channel(port_id, channel_id), || {
                MissingResource::Channel {
                    port_id: port_id.clone(),
                    channel_id: channel_id.clone(),
                }
            })?;

            let channel_end =
                ChannelEnd::decode_vec(&result.value).map_err(DecodingError::from)?;

            Ok(result.map(|_| channel_end))
        }
    }
}

/// Queries the commitment of the packet sent on the given channel with the
/// given sequence.
pub fn query_packet_commitment<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
    sequence: Sequence,
    include_proof: IncludeProof,
) -> Result<QueryResult<PacketCommitment>, QueryError>
where
    Ctx: QueryContext,
{
    match include_proof {
        IncludeProof::No => {
            debug!("querying packet commitment {port_id}/{channel_id}/{sequence} directly");

            let request = QueryPacketCommitmentRequest {
                port_id: port_id.to_string(),
                channel_id: channel_id.to_string(),
                sequence: sequence.value(),
            };

            let response = ctx.packet_commitment(request, ctx.query_height())?;

            Ok(QueryResult::unproven(
                response.commitment.into(),
                served_height(response.proof_height)?,
            ))
        }
        IncludeProof::Yes => {
            let result = query_store(
                ctx,
                key_packet_commitment(port_id, channel_id, sequence),
                || MissingResource::PacketCommitment {
                    port_id: port_id.clone(),
                    channel_id: channel_id.clone(),
                    sequence,
                },
            )?;

            Ok(result.map(PacketCommitment::from))
        }
    }
}

/// Queries the sequence of the next packet the given channel expects to
/// receive.
pub fn query_next_sequence_receive<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
    include_proof: IncludeProof,
) -> Result<QueryResult<Sequence>, QueryError>
where
    Ctx: QueryContext,
{
    match include_proof {
        IncludeProof::No => {
            debug!("querying next sequence receive of {port_id}/{channel_id} directly");

            let request = QueryNextSequenceReceiveRequest {
                port_id: port_id.to_string(),
                channel_id: channel_id.to_string(),
            };

            let response = ctx.next_sequence_receive(request, ctx.query_height())?;

            Ok(QueryResult::unproven(
                response.next_sequence_receive.into(),
                served_height(response.proof_height)?,
            ))
        }
        IncludeProof::Yes => {
            let result = query_store(ctx, key_next_sequence_recv(port_id, channel_id), || {
                MissingResource::NextSequenceReceive {
                    port_id: port_id.clone(),
                    channel_id: channel_id.clone(),
                }
            })?;

            let sequence = Sequence::from_be_slice(&result.value)?;

            Ok(result.map(|_| sequence))
        }
    }
}

/// Queries the client state of the client the channel is built on.
///
/// The client is always resolved through the channel query service. When a
/// proof is requested, the client state is queried again under its own
/// `clients/{client_id}/clientState` key and the value, the proof and the
/// proof height all come from that second query, so the proof authenticates
/// exactly the returned value.
pub fn query_channel_client_state<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
    include_proof: IncludeProof,
) -> Result<QueryResult<IdentifiedClientState>, QueryError>
where
    Ctx: QueryContext,
{
    debug!("querying client state of channel {port_id}/{channel_id}");

    let request = QueryChannelClientStateRequest {
        port_id: port_id.to_string(),
        channel_id: channel_id.to_string(),
    };

    let response = ctx.channel_client_state(request, ctx.query_height())?;

    let mut identified: IdentifiedClientState = response
        .identified_client_state
        .ok_or_else(|| QueryError::missing_field("identified client state"))?
        .try_into()?;

    match include_proof {
        IncludeProof::No => Ok(QueryResult::unproven(
            identified,
            served_height(response.proof_height)?,
        )),
        IncludeProof::Yes => {
            let proven = query_client_state_with_proof(ctx, &identified.client_id)?;

            identified.client_state = proven.value;

            Ok(QueryResult {
                value: identified,
                proof: proven.proof,
                query_height: proven.query_height,
            })
        }
    }
}

/// Queries the consensus state the channel's client holds for `height`.
///
/// Follows the same two-step shape as [`query_channel_client_state`]: with a
/// proof requested, the consensus state is re-read under
/// `clients/{client_id}/consensusStates/{height}` and that query supplies the
/// value, the proof and the proof height.
pub fn query_channel_consensus_state<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
    height: Height,
    include_proof: IncludeProof,
) -> Result<QueryResult<IdentifiedConsensusState>, QueryError>
where
    Ctx: QueryContext,
{
    debug!("querying consensus state of channel {port_id}/{channel_id} at {height}");

    let request = QueryChannelConsensusStateRequest {
        port_id: port_id.to_string(),
        channel_id: channel_id.to_string(),
        revision_number: height.revision_number(),
        revision_height: height.revision_height(),
    };

    let response = ctx.channel_consensus_state(request, ctx.query_height())?;

    let client_id: ClientId = response.client_id.parse()?;

    let consensus_state = response
        .consensus_state
        .ok_or_else(|| QueryError::missing_field("consensus state"))?;

    let mut identified = IdentifiedConsensusState::new(client_id, consensus_state);

    match include_proof {
        IncludeProof::No => Ok(QueryResult::unproven(
            identified,
            served_height(response.proof_height)?,
        )),
        IncludeProof::Yes => {
            let proven = query_consensus_state_with_proof(ctx, &identified.client_id, height)?;

            identified.consensus_state = proven.value;

            Ok(QueryResult {
                value: identified,
                proof: proven.proof,
                query_height: proven.query_height,
            })
        }
    }
}

/// Queries the consensus state the channel's client holds for the client's
/// own latest height.
///
/// Returns both the client's latest height, which selected the consensus
/// state, and the height the consensus state query was served at. Only the
/// latter is a valid height to prove the consensus state at.
pub fn query_latest_consensus_state<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<LatestConsensusState, QueryError>
where
    Ctx: QueryContext,
{
    let client_state_res = query_channel_client_state(ctx, port_id, channel_id, IncludeProof::No)?;

    let client_state = ctx
        .codec()
        .unpack_client_state(&client_state_res.value.client_state)?;

    let client_height = Height::try_from(client_state.latest_height())?;

    debug!(
        "client {} of channel {port_id}/{channel_id} is at {client_height}",
        client_state_res.value.client_id
    );

    let consensus_state_res = query_channel_consensus_state(
        ctx,
        port_id,
        channel_id,
        client_height,
        IncludeProof::No,
    )?;

    if consensus_state_res.value.client_id != client_state_res.value.client_id {
        warn!(
            "channel {port_id}/{channel_id} resolved to client {} but its consensus state belongs to client {}",
            client_state_res.value.client_id, consensus_state_res.value.client_id
        );
    }

    let consensus_state = ctx
        .codec()
        .unpack_consensus_state(&consensus_state_res.value.consensus_state)?;

    Ok(LatestConsensusState {
        consensus_state,
        client_height,
        proof_height: consensus_state_res.query_height,
    })
}
