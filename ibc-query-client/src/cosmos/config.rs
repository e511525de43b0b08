use ibc_query_types::identifiers::ChainId;
use serde::{Deserialize, Serialize};
use tendermint_rpc::Url;
use typed_builder::TypedBuilder;

use crate::types::QueryHeight;

/// Endpoints and defaults of a [`CosmosQueryContext`](super::CosmosQueryContext).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// The queried chain. Its revision number becomes the revision of every
    /// proof height.
    pub chain_id: ChainId,
    /// Tendermint RPC endpoint serving ABCI store queries.
    pub rpc_addr: Url,
    /// gRPC endpoint serving the IBC channel query service.
    pub grpc_addr: Url,
    #[serde(default)]
    #[builder(default)]
    pub height: QueryHeight,
}

#[cfg(test)]
mod tests {
    use ibc_query_types::height::Height;

    use super::*;

    #[test]
    fn parse_config_with_defaults() {
        let config: QueryConfig = serde_json::from_str(
            r#"{
                "chain_id": "ibc-1",
                "rpc_addr": "http://127.0.0.1:26657",
                "grpc_addr": "http://127.0.0.1:9090"
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.chain_id.revision_number(), 1);
        assert_eq!(config.height, QueryHeight::Latest);
        assert_eq!(config.grpc_addr.port(), 9090);
    }

    #[test]
    fn parse_config_pinned_to_height() {
        let config: QueryConfig = serde_json::from_str(
            r#"{
                "chain_id": "ibc-0",
                "rpc_addr": "http://127.0.0.1:26657",
                "grpc_addr": "http://127.0.0.1:9090",
                "height": { "Specific": { "revision_number": 0, "revision_height": 150 } }
            }"#,
        )
        .expect("valid config");

        assert_eq!(
            config.height,
            QueryHeight::Specific(Height::new(0, 150).expect("valid height"))
        );
    }

    #[test]
    fn zero_pinned_height_is_rejected() {
        let config: Result<QueryConfig, _> = serde_json::from_str(
            r#"{
                "chain_id": "ibc-0",
                "rpc_addr": "http://127.0.0.1:26657",
                "grpc_addr": "http://127.0.0.1:9090",
                "height": { "Specific": { "revision_number": 0, "revision_height": 0 } }
            }"#,
        );

        assert!(config.is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let config: Result<QueryConfig, _> = serde_json::from_str(
            r#"{
                "chain_id": "ibc-0",
                "rpc_addr": "http://127.0.0.1:26657",
                "grpc_addr": "http://127.0.0.1:9090",
                "websocket_addr": "ws://127.0.0.1:26657/websocket"
            }"#,
        );

        assert!(config.is_err());
    }

    #[test]
    fn build_config() {
        let config = QueryConfig::builder()
            .chain_id(ChainId::new("ibc-2").expect("valid chain id"))
            .rpc_addr("http://127.0.0.1:26657".parse().expect("valid url"))
            .grpc_addr("http://127.0.0.1:9090".parse().expect("valid url"))
            .build();

        assert_eq!(config.height, QueryHeight::Latest);
    }
}
