//! A minimal light client used to exercise the query paths without a real
//! chain. Its states are registered with an
//! [`InterfaceRegistry`](crate::codec::InterfaceRegistry) like any other
//! client type.

use ibc_proto::google::protobuf::Any;
use ibc_proto::Protobuf;

use crate::error::DecodingError;
use crate::height::{ClientHeight, Height};
use crate::prelude::*;

pub const MOCK_CLIENT_TYPE: &str = "9999-mock";
pub const MOCK_CLIENT_STATE_TYPE_URL: &str = "/ibc.mock.ClientState";
pub const MOCK_CONSENSUS_STATE_TYPE_URL: &str = "/ibc.mock.ConsensusState";

pub mod proto {
    use ibc_proto::ibc::core::client::v1::Height as RawHeight;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Header {
        #[prost(message, optional, tag = "1")]
        pub height: Option<RawHeight>,
        #[prost(uint64, tag = "2")]
        pub timestamp: u64,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ClientState {
        #[prost(message, optional, tag = "1")]
        pub header: Option<Header>,
        #[prost(bool, tag = "2")]
        pub frozen: bool,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ConsensusState {
        #[prost(message, optional, tag = "1")]
        pub header: Option<Header>,
    }
}

use proto::{
    ClientState as RawMockClientState, ConsensusState as RawMockConsensusState,
    Header as RawMockHeader,
};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockHeader {
    pub height: Height,
    /// Nanoseconds since the unix epoch.
    pub timestamp: u64,
}

impl MockHeader {
    pub fn new(height: Height) -> Self {
        Self {
            height,
            timestamp: 0,
        }
    }

    pub fn with_timestamp(self, timestamp: u64) -> Self {
        Self { timestamp, ..self }
    }
}

impl Protobuf<RawMockHeader> for MockHeader {}

impl TryFrom<RawMockHeader> for MockHeader {
    type Error = DecodingError;

    fn try_from(raw: RawMockHeader) -> Result<Self, Self::Error> {
        Ok(Self {
            height: raw
                .height
                .ok_or_else(|| DecodingError::missing_raw_data("mock header height"))?
                .try_into()
                .map_err(|e| DecodingError::invalid_raw_data(format!("mock header height: {e}")))?,
            timestamp: raw.timestamp,
        })
    }
}

impl From<MockHeader> for RawMockHeader {
    fn from(value: MockHeader) -> Self {
        Self {
            height: Some(value.height.into()),
            timestamp: value.timestamp,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockClientState {
    pub header: MockHeader,
    pub frozen: bool,
}

impl MockClientState {
    pub fn new(header: MockHeader) -> Self {
        Self {
            header,
            frozen: false,
        }
    }

    pub fn latest_height(&self) -> ClientHeight {
        ClientHeight::Revision(self.header.height)
    }

    pub fn frozen(self) -> Self {
        Self {
            frozen: true,
            ..self
        }
    }
}

impl Protobuf<RawMockClientState> for MockClientState {}

impl TryFrom<RawMockClientState> for MockClientState {
    type Error = DecodingError;

    fn try_from(raw: RawMockClientState) -> Result<Self, Self::Error> {
        Ok(Self {
            header: raw
                .header
                .ok_or_else(|| DecodingError::missing_raw_data("mock client header"))?
                .try_into()?,
            frozen: raw.frozen,
        })
    }
}

impl From<MockClientState> for RawMockClientState {
    fn from(value: MockClientState) -> Self {
        RawMockClientState {
            header: Some(value.header.into()),
            frozen: value.frozen,
        }
    }
}

impl From<MockClientState> for Any {
    fn from(client_state: MockClientState) -> Self {
        Any {
            type_url: MOCK_CLIENT_STATE_TYPE_URL.to_string(),
            value: Protobuf::<RawMockClientState>::encode_vec(client_state),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockConsensusState {
    pub header: MockHeader,
}

impl MockConsensusState {
    pub fn new(header: MockHeader) -> Self {
        Self { header }
    }

    pub fn timestamp(&self) -> u64 {
        self.header.timestamp
    }
}

impl Protobuf<RawMockConsensusState> for MockConsensusState {}

impl TryFrom<RawMockConsensusState> for MockConsensusState {
    type Error = DecodingError;

    fn try_from(raw: RawMockConsensusState) -> Result<Self, Self::Error> {
        Ok(Self {
            header: raw
                .header
                .ok_or_else(|| DecodingError::missing_raw_data("mock consensus header"))?
                .try_into()?,
        })
    }
}

impl From<MockConsensusState> for RawMockConsensusState {
    fn from(value: MockConsensusState) -> Self {
        Self {
            header: Some(value.header.into()),
        }
    }
}

impl From<MockConsensusState> for Any {
    fn from(consensus_state: MockConsensusState) -> Self {
        Any {
            type_url: MOCK_CONSENSUS_STATE_TYPE_URL.to_string(),
            value: Protobuf::<RawMockConsensusState>::encode_vec(consensus_state),
        }
    }
}
