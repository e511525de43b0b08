//! Normalized results shared by both query modes.

use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_query_types::client::AnyConsensusState;
use ibc_query_types::commitment::CommitmentProofBytes;
use ibc_query_types::height::Height;
use serde::{Deserialize, Serialize};

/// Selects between a direct query and a proof-backed store query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncludeProof {
    Yes,
    No,
}

impl IncludeProof {
    pub fn to_bool(&self) -> bool {
        *self == IncludeProof::Yes
    }
}

impl From<bool> for IncludeProof {
    fn from(prove: bool) -> Self {
        if prove {
            IncludeProof::Yes
        } else {
            IncludeProof::No
        }
    }
}

/// The height at which a node is asked to serve a query.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryHeight {
    #[default]
    Latest,
    Specific(Height),
}

impl QueryHeight {
    /// The value sent to the node, where `0` stands for the latest height.
    pub fn revision_height(&self) -> u64 {
        match self {
            QueryHeight::Latest => 0,
            QueryHeight::Specific(height) => height.revision_height(),
        }
    }
}

impl From<Height> for QueryHeight {
    fn from(height: Height) -> Self {
        QueryHeight::Specific(height)
    }
}

impl Display for QueryHeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            QueryHeight::Latest => write!(f, "latest height"),
            QueryHeight::Specific(height) => write!(f, "{height}"),
        }
    }
}

/// What a proof-backed store read returns: the raw value stored under the
/// key, the proof of its (non-)membership and the height the proof verifies
/// at. An empty `value` means nothing is stored under the key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreQueryResponse {
    pub value: Vec<u8>,
    pub proof: Vec<u8>,
    pub proof_height: Height,
}

/// A queried value together with how it was obtained.
///
/// `query_height` is the height the node served the query at. A proof, when
/// present, verifies against the state root committed at that height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryResult<T> {
    pub value: T,
    pub proof: Option<CommitmentProofBytes>,
    pub query_height: Height,
}

impl<T> QueryResult<T> {
    pub fn unproven(value: T, query_height: Height) -> Self {
        Self {
            value,
            proof: None,
            query_height,
        }
    }

    pub fn proven(value: T, proof: CommitmentProofBytes, proof_height: Height) -> Self {
        Self {
            value,
            proof: Some(proof),
            query_height: proof_height,
        }
    }

    /// The height the proof verifies at. `None` for unproven results.
    pub fn proof_height(&self) -> Option<Height> {
        self.proof.as_ref().map(|_| self.query_height)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> QueryResult<U> {
        QueryResult {
            value: f(self.value),
            proof: self.proof,
            query_height: self.query_height,
        }
    }
}

/// The consensus state a channel's client holds for its own latest height.
///
/// `client_height` selected the consensus state; `proof_height` is the height
/// the consensus state query was served at. A later proof of this consensus
/// state must be built at `proof_height`.
#[derive(Clone, Debug, PartialEq)]
pub struct LatestConsensusState {
    pub consensus_state: AnyConsensusState,
    pub client_height: Height,
    pub proof_height: Height,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn unproven_result_has_no_proof_height() {
        let height = Height::new(0, 10).expect("valid height");
        let result = QueryResult::unproven(7u64, height);

        assert!(result.proof.is_none());
        assert_eq!(result.proof_height(), None);
        assert_eq!(result.query_height, height);
    }

    #[test]
    fn proven_result_exposes_proof_height() {
        let height = Height::new(1, 22).expect("valid height");
        let proof = CommitmentProofBytes::try_from(vec![1, 2, 3]).expect("non-empty proof");
        let result = QueryResult::proven("value", proof, height).map(str::len);

        assert_eq!(result.value, 5);
        assert_eq!(result.proof_height(), Some(height));
    }

    #[rstest]
    #[case(QueryHeight::Latest, 0, "latest height")]
    #[case(QueryHeight::Specific(Height::new(2, 15).expect("valid height")), 15, "2-15")]
    fn query_height_rendering(
        #[case] height: QueryHeight,
        #[case] revision_height: u64,
        #[case] display: &str,
    ) {
        assert_eq!(height.revision_height(), revision_height);
        assert_eq!(height.to_string(), display);
    }

    #[test]
    fn include_proof_from_flag() {
        assert_eq!(IncludeProof::from(true), IncludeProof::Yes);
        assert!(!IncludeProof::from(false).to_bool());
    }
}
