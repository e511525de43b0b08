//! Dual-mode queries of IBC resources.
//!
//! Each query either asks the node directly or reads the resource's raw
//! store key with a proof. Both paths end up in the same
//! [`QueryResult`](crate::types::QueryResult).

pub mod channel;
pub mod client;

use ibc_proto::ibc::core::client::v1::Height as RawHeight;
use ibc_query_types::commitment::CommitmentProofBytes;
use ibc_query_types::height::Height;
use tracing::{debug, trace};

use crate::context::QueryContext;
use crate::error::{MissingResource, QueryError};
use crate::types::QueryResult;

/// Reads `key` from the IBC store together with its proof.
///
/// An empty value is the only existence check: it fails with `NotFound`
/// naming the resource.
pub(crate) fn query_store<Ctx, F>(
    ctx: &Ctx,
    key: Vec<u8>,
    missing: F,
) -> Result<QueryResult<Vec<u8>>, QueryError>
where
    Ctx: QueryContext,
    F: FnOnce() -> MissingResource,
{
    let height = ctx.query_height();

    debug!(
        "querying store key `{}` with proof at {height}",
        String::from_utf8_lossy(&key)
    );

    let response = ctx.query_proof(&key, height)?;

    trace!(
        "store returned {} value bytes and {} proof bytes at {}",
        response.value.len(),
        response.proof.len(),
        response.proof_height
    );

    if response.value.is_empty() {
        return Err(QueryError::NotFound(missing()));
    }

    let proof = CommitmentProofBytes::try_from(response.proof).map_err(|_| {
        QueryError::missing_proof(format!(
            "empty proof for store key `{}`",
            String::from_utf8_lossy(&key)
        ))
    })?;

    Ok(QueryResult::proven(
        response.value,
        proof,
        response.proof_height,
    ))
}

/// The height a direct query was served at, as reported in the response's
/// `proof_height` field.
pub(crate) fn served_height(proof_height: Option<RawHeight>) -> Result<Height, QueryError> {
    let raw = proof_height.ok_or_else(|| QueryError::missing_field("proof height"))?;

    Ok(Height::try_from(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn served_height_requires_a_height() {
        assert!(matches!(served_height(None), Err(QueryError::Decoding(_))));
    }

    #[test]
    fn served_height_rejects_zero() {
        let raw = RawHeight {
            revision_number: 0,
            revision_height: 0,
        };

        assert!(matches!(
            served_height(Some(raw)),
            Err(QueryError::Decoding(_))
        ));
    }

    #[test]
    fn served_height_converts() {
        let raw = RawHeight {
            revision_number: 4,
            revision_height: 18,
        };

        assert_eq!(
            served_height(Some(raw)).expect("valid height"),
            Height::new(4, 18).expect("valid height")
        );
    }
}
