use ibc_query_types::staking::{ConsensusPubKey, HistoricalInfo, Validator};
use subtle_encoding::bech32;
use tendermint::block::Header;
use tendermint_testgen::{Generator, Header as TestgenHeader, Validator as TestgenValidator};

pub const VALOPER_PREFIX: &str = "cosmosvaloper";

/// Returns a bonded validator whose operator address decodes to twenty
/// `address_byte`s, for testing purposes only!
pub fn dummy_validator(id: &str, address_byte: u8) -> Validator {
    let info = TestgenValidator::new(id)
        .generate()
        .expect("Never fails");

    let operator_address = bech32::encode(VALOPER_PREFIX, [address_byte; 20]);

    Validator::new(&operator_address, ConsensusPubKey(info.pub_key))
        .expect("Never fails")
        .with_tokens(100)
}

/// Returns a dummy header at `height`, for testing purposes only!
pub fn dummy_header(height: u64) -> Header {
    TestgenHeader::new(&[TestgenValidator::new("1").voting_power(50)])
        .height(height)
        .generate()
        .expect("Never fails")
}

/// Returns a historical info at `height` over validators with the given
/// operator address bytes, for testing purposes only!
pub fn dummy_historical_info(height: u64, address_bytes: &[u8]) -> HistoricalInfo {
    let valset = address_bytes
        .iter()
        .map(|b| dummy_validator(&format!("val-{b}"), *b))
        .collect();

    HistoricalInfo::new(dummy_header(height), valset)
}
