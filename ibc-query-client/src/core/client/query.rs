//! Queries the client and consensus states stored under the client-scoped
//! `clients/{client_id}/...` keys.

use ibc_query_types::error::DecodingError;
use ibc_query_types::height::Height;
use ibc_query_types::identifiers::ClientId;
use ibc_query_types::path::{full_client_state_key, full_consensus_state_key};
use ibc_query_types::proto::Any;
use prost::Message;

use crate::context::QueryContext;
use crate::core::query_store;
use crate::error::{MissingResource, QueryError};
use crate::types::QueryResult;

/// Queries the packed client state of `client_id` together with its proof.
pub fn query_client_state_with_proof<Ctx>(
    ctx: &Ctx,
    client_id: &ClientId,
) -> Result<QueryResult<Any>, QueryError>
where
    Ctx: QueryContext,
{
    let result = query_store(ctx, full_client_state_key(client_id), || {
        MissingResource::ClientState {
            client_id: client_id.clone(),
        }
    })?;

    decode_any(result)
}

/// Queries the packed consensus state `client_id` holds for `height`,
/// together with its proof.
pub fn query_consensus_state_with_proof<Ctx>(
    ctx: &Ctx,
    client_id: &ClientId,
    height: Height,
) -> Result<QueryResult<Any>, QueryError>
where
    Ctx: QueryContext,
{
    let result = query_store(ctx, full_consensus_state_key(client_id, height), || {
        MissingResource::ConsensusState {
            client_id: client_id.clone(),
            height,
        }
    })?;

    decode_any(result)
}

fn decode_any(result: QueryResult<Vec<u8>>) -> Result<QueryResult<Any>, QueryError> {
    let any = Any::decode(result.value.as_slice()).map_err(DecodingError::from)?;

    Ok(QueryResult {
        value: any,
        proof: result.proof,
        query_height: result.query_height,
    })
}
