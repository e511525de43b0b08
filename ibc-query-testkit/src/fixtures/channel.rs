use ibc_proto::ibc::core::channel::v1::{Channel as RawChannel, Counterparty as RawCounterparty};
use ibc_query_client::types::IncludeProof;
use ibc_query_types::channel::{ChannelEnd, Counterparty, Order, State, Version};
use ibc_query_types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use typed_builder::TypedBuilder;

/// Identifies the channel resource a test queries.
#[derive(Clone, Debug, TypedBuilder)]
pub struct ChannelQueryRequest {
    #[builder(default = PortId::transfer())]
    pub port_id: PortId,
    #[builder(default = ChannelId::zero())]
    pub channel_id: ChannelId,
    #[builder(default = Sequence::from(1))]
    pub sequence: Sequence,
    #[builder(default = IncludeProof::Yes)]
    pub include_proof: IncludeProof,
}

/// Returns a dummy `RawCounterparty`, for testing purposes only!
pub fn dummy_raw_counterparty_chan(channel_id: String) -> RawCounterparty {
    RawCounterparty {
        port_id: PortId::transfer().to_string(),
        channel_id,
    }
}

/// Returns a dummy `RawChannel`, for testing purposes only!
/// Can be optionally parametrized with a specific counterparty channel identifier.
pub fn dummy_raw_channel_end(state: i32, channel_id: Option<u64>) -> RawChannel {
    let channel_id = match channel_id {
        Some(id) => ChannelId::new(id).to_string(),
        None => "".to_string(),
    };
    RawChannel {
        state,
        ordering: 1,
        counterparty: Some(dummy_raw_counterparty_chan(channel_id)),
        connection_hops: vec![ConnectionId::zero().to_string()],
        version: "ics20-1".to_string(),
        upgrade_sequence: 0,
    }
}

/// An open, unordered `transfer` channel on `connection-0` whose counterparty
/// is `transfer/channel-0`.
pub fn dummy_channel_end() -> ChannelEnd {
    ChannelEnd::new(
        State::Open,
        Order::Unordered,
        Counterparty::new(PortId::transfer(), Some(ChannelId::zero())),
        vec![ConnectionId::zero()],
        Version::new("ics20-1".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use ibc_query_types::proto::Protobuf;

    use super::*;

    #[test]
    fn channel_end_try_from_raw() {
        let raw_channel_end = dummy_raw_channel_end(3, Some(0));

        let empty_raw_channel_end = RawChannel {
            counterparty: None,
            ..raw_channel_end.clone()
        };

        let unknown_state_channel_end = RawChannel {
            state: 42,
            ..raw_channel_end.clone()
        };

        assert!(ChannelEnd::try_from(empty_raw_channel_end).is_err());
        assert!(ChannelEnd::try_from(unknown_state_channel_end).is_err());
        assert_eq!(
            ChannelEnd::try_from(raw_channel_end).expect("valid channel end"),
            dummy_channel_end()
        );
    }

    #[test]
    fn channel_end_survives_store_encoding() {
        let channel_end = dummy_channel_end();

        let decoded = ChannelEnd::decode_vec(&channel_end.clone().encode_vec())
            .expect("valid channel end bytes");

        assert_eq!(decoded, channel_end);
    }
}
