//! ICS-24 identifier validation.

use crate::error::IdentifierError as Error;

const VALID_SPECIAL_CHARS: &str = "._+-#[]<>";

/// Checks that the identifier only contains alphanumerics and the ICS-24
/// special characters `.`, `_`, `+`, `-`, `#`, `[`, `]`, `<`, `>`.
pub(crate) fn validate_identifier_chars(id: &str) -> Result<(), Error> {
    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || VALID_SPECIAL_CHARS.contains(c))
    {
        return Err(Error::InvalidCharacter { id: id.into() });
    }

    Ok(())
}

/// Checks that the identifier length lies within `[min, max]`. Empty
/// identifiers are always rejected.
pub(crate) fn validate_identifier_length(id: &str, min: u64, max: u64) -> Result<(), Error> {
    let min = min.max(1);
    let length = id.len() as u64;
    if (min..=max).contains(&length) {
        Ok(())
    } else {
        Err(Error::InvalidLength {
            id: id.into(),
            min,
            max,
        })
    }
}

/// Checks that a prefix leaves room for a `-{u64}` suffix within the given
/// identifier bounds.
pub(crate) fn validate_prefix_length(
    prefix: &str,
    min_id_length: u64,
    max_id_length: u64,
) -> Result<(), Error> {
    // `{prefix}-0` is 2 characters longer than the prefix,
    // `{prefix}-{u64::MAX}` is 21 characters longer.
    let min = min_id_length.saturating_sub(2);
    let max = max_id_length.saturating_sub(21);

    validate_identifier_length(prefix, min, max)
}

/// Checks if the identifier is a valid named u64 index: `{name}-{u64}`.
pub(crate) fn validate_named_u64_index(id: &str, name: &str) -> Result<(), Error> {
    let number_s = id
        .strip_prefix(name)
        .ok_or_else(|| Error::InvalidPrefix { prefix: id.into() })?
        .strip_prefix('-')
        .ok_or_else(|| Error::InvalidPrefix { prefix: id.into() })?;

    if number_s.starts_with('0') && number_s.len() > 1 {
        return Err(Error::InvalidPrefix { prefix: id.into() });
    }

    _ = number_s
        .parse::<u64>()
        .map_err(|_| Error::InvalidPrefix { prefix: id.into() })?;

    Ok(())
}

/// A valid client identifier must be between 9-64 characters.
pub(crate) fn validate_client_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 9, 64)
}

/// A valid connection identifier must be between 10-64 characters and
/// indexed as `connection-{n}`.
pub(crate) fn validate_connection_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 10, 64)?;
    validate_named_u64_index(id, "connection")
}

/// A valid port identifier must be between 2-128 characters.
pub(crate) fn validate_port_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 2, 128)
}

/// A valid channel identifier must be between 8-64 characters and indexed as
/// `channel-{n}`.
pub(crate) fn validate_channel_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 8, 64)?;
    validate_named_u64_index(id, "channel")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::transfer("transfer", true)]
    #[case::too_short("p", false)]
    #[case::path_separator("trans/fer", false)]
    #[case::special_chars("wasm.cosmos1abc#[x]", true)]
    fn port_identifier(#[case] id: &str, #[case] success: bool) {
        assert_eq!(validate_port_identifier(id).is_ok(), success);
    }

    #[rstest]
    #[case::zero("channel-0", true)]
    #[case::u64_max("channel-18446744073709551615", true)]
    #[case::too_short("channel", false)]
    #[case::zero_padded("channel-0123", false)]
    #[case::missing_dash("channel0123", false)]
    #[case::u64_max_plus_1("channel-18446744073709551616", false)]
    #[case::bad_char("channel@01", false)]
    fn channel_identifier(#[case] id: &str, #[case] success: bool) {
        assert_eq!(validate_channel_identifier(id).is_ok(), success, "{id}");
    }

    #[rstest]
    #[case::tendermint("07-tendermint-0", true)]
    #[case::too_short("client", false)]
    #[case::too_long(
        "f0isrs5enif9e4td3r2jcbxoevhz6u1fthn4aforq7ams52jn5m48eiesfht9ckpn",
        false
    )]
    fn client_identifier(#[case] id: &str, #[case] success: bool) {
        assert_eq!(validate_client_identifier(id).is_ok(), success);
    }

    #[test]
    fn connection_identifier_requires_index() {
        validate_connection_identifier("connection-7").expect("success");
        validate_connection_identifier("connection000").expect_err("failure");
        validate_connection_identifier("connect01").expect_err("failure");
    }

    #[rstest]
    #[case::empty_prefix("", 1, 64, false)]
    #[case::u64_max_is_too_big("a", 3, 21, false)]
    #[case::u64_min_max_boundary("a", 3, 22, true)]
    #[case("chainA", 1, 64, true)]
    fn prefix_length(
        #[case] prefix: &str,
        #[case] min: u64,
        #[case] max: u64,
        #[case] success: bool,
    ) {
        assert_eq!(validate_prefix_length(prefix, min, max).is_ok(), success);
    }
}
