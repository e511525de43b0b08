//! The staking module's `HistoricalInfo` record: a block header together
//! with the validator set that was bonded at that height.

mod historical_info;
pub mod pubkey;
mod validator;

use displaydoc::Display;

pub use historical_info::{
    marshal_historical_info, must_marshal_historical_info, must_unmarshal_historical_info,
    unmarshal_historical_info, HistoricalInfo,
};
pub use pubkey::ConsensusPubKey;
pub use validator::{BondStatus, Validator};

use crate::codec::UnpackError;
use crate::error::DecodingError;
use crate::prelude::*;

#[derive(Debug, Display)]
pub enum StakingError {
    /// invalid historical info: {reason}
    InvalidHistoricalInfo { reason: String },
    /// decoding error: {0}
    Decoding(DecodingError),
    /// consensus key `{key}` has no Cosmos SDK type URL
    UnsupportedConsensusKey { key: String },
    /// failed to unpack the consensus key of validator `{operator_address}`: {error}
    ConsensusKey {
        operator_address: String,
        error: UnpackError,
    },
}

impl From<DecodingError> for StakingError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StakingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Decoding(e) => Some(e),
            Self::ConsensusKey { error, .. } => Some(error),
            Self::InvalidHistoricalInfo { .. } | Self::UnsupportedConsensusKey { .. } => None,
        }
    }
}
