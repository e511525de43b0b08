//! Errors surfaced by the query functions.

use displaydoc::Display;
use ibc_query_types::codec::UnpackError;
use ibc_query_types::error::{DecodingError, IdentifierError};
use ibc_query_types::height::{Height, HeightError};
use ibc_query_types::identifiers::{ChannelId, ClientId, PortId, Sequence};
use tonic::Status;

/// The main error type of the query client. Every failure of a sub-query is
/// surfaced with its kind preserved; nothing is retried.
#[derive(Debug, Display)]
pub enum QueryError {
    /// transport error: `{0}`
    Transport(TransportError),
    /// {0} not found
    NotFound(MissingResource),
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// unpack error: `{0}`
    Unpack(UnpackError),
    /// height type mismatch: expected `{expected}`, actual `{actual}`
    HeightTypeMismatch { expected: String, actual: String },
    /// missing proof: `{0}`
    MissingProof(String),
}

impl QueryError {
    pub fn missing_proof<T: ToString>(description: T) -> Self {
        Self::MissingProof(description.to_string())
    }

    pub fn missing_field<T: ToString>(description: T) -> Self {
        Self::Decoding(DecodingError::missing_raw_data(description))
    }

    /// Whether the queried resource does not exist, as opposed to the query
    /// failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<TransportError> for QueryError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<DecodingError> for QueryError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<IdentifierError> for QueryError {
    fn from(e: IdentifierError) -> Self {
        Self::Decoding(DecodingError::Identifier(e))
    }
}

impl From<UnpackError> for QueryError {
    fn from(e: UnpackError) -> Self {
        Self::Unpack(e)
    }
}

impl From<HeightError> for QueryError {
    fn from(e: HeightError) -> Self {
        match e {
            HeightError::MismatchedHeightType { expected, actual } => {
                Self::HeightTypeMismatch { expected, actual }
            }
            other => Self::Decoding(DecodingError::invalid_raw_data(other)),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Transport(e) => Some(e),
            Self::Decoding(e) => Some(e),
            Self::Unpack(e) => Some(e),
            Self::NotFound(_) | Self::HeightTypeMismatch { .. } | Self::MissingProof(_) => None,
        }
    }
}

/// Identifies a resource that is absent from the queried store.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum MissingResource {
    /// channel end `{port_id}/{channel_id}`
    Channel {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// packet commitment `{port_id}/{channel_id}/{sequence}`
    PacketCommitment {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
    },
    /// next sequence receive of `{port_id}/{channel_id}`
    NextSequenceReceive {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// client state of `{client_id}`
    ClientState { client_id: ClientId },
    /// consensus state of `{client_id}` at height {height}
    ConsensusState { client_id: ClientId, height: Height },
}

/// Failures of the collaborators that talk to the chain. The original cause
/// is kept as the error source.
#[derive(Debug, Display)]
pub enum TransportError {
    /// gRPC status: `{0}`
    Grpc(Status),
    /// failed to connect to gRPC endpoint: `{0}`
    GrpcConnect(tonic::transport::Error),
    /// RPC error: `{0}`
    Rpc(tendermint_rpc::Error),
    /// ABCI query returned code {code}: {log}
    AbciQuery { code: u32, log: String },
    /// cannot query at height {height}: {reason}
    InvalidQueryHeight { height: Height, reason: String },
    /// malformed proof in query response: `{0}`
    MalformedProof(prost::DecodeError),
    /// {0}
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl From<Status> for TransportError {
    fn from(e: Status) -> Self {
        Self::Grpc(e)
    }
}

impl From<tonic::transport::Error> for TransportError {
    fn from(e: tonic::transport::Error) -> Self {
        Self::GrpcConnect(e)
    }
}

impl From<tendermint_rpc::Error> for TransportError {
    fn from(e: tendermint_rpc::Error) -> Self {
        Self::Rpc(e)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Grpc(e) => Some(e),
            Self::GrpcConnect(e) => Some(e),
            Self::Rpc(e) => Some(e),
            Self::MalformedProof(e) => Some(e),
            Self::Other(e) => Some(e.as_ref()),
            Self::AbciQuery { .. } | Self::InvalidQueryHeight { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn not_found_names_resource_and_keys() {
        let err = QueryError::NotFound(MissingResource::PacketCommitment {
            port_id: PortId::transfer(),
            channel_id: ChannelId::new(0),
            sequence: 7.into(),
        });

        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "packet commitment `transfer/channel-0/7` not found"
        );
    }

    #[test]
    fn height_mismatch_keeps_both_shapes() {
        let err = QueryError::from(HeightError::MismatchedHeightType {
            expected: "Height".to_string(),
            actual: "Sequence".to_string(),
        });

        assert_eq!(
            err.to_string(),
            "height type mismatch: expected `Height`, actual `Sequence`"
        );
    }

    #[test]
    fn transport_cause_is_preserved() {
        let err = QueryError::from(TransportError::from(Status::unavailable("node down")));

        let source = err.source().and_then(|e| e.source());
        let status = source
            .and_then(|e| e.downcast_ref::<Status>())
            .expect("status is the root cause");
        assert_eq!(status.code(), tonic::Code::Unavailable);
    }
}
