//! Proof-backed store queries over Tendermint RPC.

use std::sync::Arc;

use ibc_query_types::height::Height;
use ibc_query_types::identifiers::ChainId;
use tendermint::block;
use tendermint_rpc::{Client, HttpClient, Url};
use tokio::runtime::Runtime as TokioRuntime;
use tracing::trace;

use crate::context::ProofQuery;
use crate::cosmos::merkle::convert_tm_to_ics_merkle_proof;
use crate::error::TransportError;
use crate::types::{QueryHeight, StoreQueryResponse};

/// ABCI query path of raw key lookups in the IBC store.
pub const IBC_QUERY_PATH: &str = "store/ibc/key";

/// Reads the IBC store through the `abci_query` endpoint of a Tendermint
/// node, always asking for a proof.
#[derive(Clone)]
pub struct TendermintProofQuery {
    chain_id: ChainId,
    rpc_addr: Url,
    rpc_client: HttpClient,
    rt: Arc<TokioRuntime>,
}

impl TendermintProofQuery {
    pub fn new(
        chain_id: ChainId,
        rpc_addr: Url,
        rt: Arc<TokioRuntime>,
    ) -> Result<Self, TransportError> {
        let rpc_client = HttpClient::new(rpc_addr.clone())?;

        Ok(Self {
            chain_id,
            rpc_addr,
            rpc_client,
            rt,
        })
    }

    pub fn rpc_addr(&self) -> &Url {
        &self.rpc_addr
    }
}

impl ProofQuery for TendermintProofQuery {
    fn query_proof(
        &self,
        key: &[u8],
        height: QueryHeight,
    ) -> Result<StoreQueryResponse, TransportError> {
        let abci_height = abci_query_height(height)?;

        trace!(
            "abci_query `{IBC_QUERY_PATH}` on {} at {:?}",
            self.rpc_addr,
            abci_height
        );

        let response = self.rt.block_on(self.rpc_client.abci_query(
            Some(IBC_QUERY_PATH.to_owned()),
            key.to_vec(),
            abci_height,
            true,
        ))?;

        if !response.code.is_ok() {
            return Err(TransportError::AbciQuery {
                code: response.code.value(),
                log: response.log,
            });
        }

        let proof = match &response.proof {
            Some(proof_ops) => {
                convert_tm_to_ics_merkle_proof(proof_ops).map_err(TransportError::MalformedProof)?
            }
            None => Vec::new(),
        };

        Ok(StoreQueryResponse {
            value: response.value,
            proof,
            proof_height: proof_height(&self.chain_id, response.height)?,
        })
    }
}

/// The store version to query for the requested block height.
///
/// A store read at version `h - 1` is proven against the app hash committed
/// in block `h`. Heights 1 and 2 have no such version to serve a proof from.
pub(crate) fn abci_query_height(
    height: QueryHeight,
) -> Result<Option<block::Height>, TransportError> {
    match height {
        QueryHeight::Latest => Ok(None),
        QueryHeight::Specific(height) if height.revision_height() <= 2 => {
            Err(TransportError::InvalidQueryHeight {
                height,
                reason: "proof queries at height <= 2 are not supported".to_string(),
            })
        }
        QueryHeight::Specific(height) => block::Height::try_from(height.revision_height() - 1)
            .map(Some)
            .map_err(|e| TransportError::InvalidQueryHeight {
                height,
                reason: e.to_string(),
            }),
    }
}

/// The height a proof returned for store version `response_height` verifies
/// at.
pub(crate) fn proof_height(
    chain_id: &ChainId,
    response_height: block::Height,
) -> Result<Height, TransportError> {
    Height::new(chain_id.revision_number(), response_height.value() + 1)
        .map_err(|e| TransportError::Other(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn specific(revision_number: u64, revision_height: u64) -> QueryHeight {
        QueryHeight::Specific(Height::new(revision_number, revision_height).expect("valid height"))
    }

    #[rstest]
    #[case(specific(0, 1))]
    #[case(specific(0, 2))]
    #[case(specific(5, 2))]
    fn proofs_below_height_three_are_refused(#[case] height: QueryHeight) {
        assert!(matches!(
            abci_query_height(height),
            Err(TransportError::InvalidQueryHeight { .. })
        ));
    }

    #[rstest]
    #[case(QueryHeight::Latest, None)]
    #[case(specific(0, 3), Some(2))]
    #[case(specific(1, 100), Some(99))]
    fn store_version_precedes_block_height(
        #[case] height: QueryHeight,
        #[case] expected: Option<u32>,
    ) {
        let expected = expected.map(block::Height::from);

        assert_eq!(abci_query_height(height).expect("valid height"), expected);
    }

    #[test]
    fn proof_height_follows_store_version() {
        let chain_id = ChainId::new("ibc-4").expect("valid chain id");

        let height = proof_height(&chain_id, block::Height::from(9u32)).expect("valid height");

        assert_eq!(height, Height::new(4, 10).expect("valid height"));
    }
}
