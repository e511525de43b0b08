use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use crate::error::IdentifierError;
use crate::prelude::*;
use crate::validate::{
    validate_identifier_chars, validate_identifier_length, validate_prefix_length,
};

/// Identifier of the chain being queried.
///
/// Chains following the `{chain name}-{revision number}` convention carry
/// their revision number in the identifier; it becomes the revision number
/// of every proof height reported for that chain. Any other valid identifier
/// is accepted with revision number 0.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainId {
    id: String,
    revision_number: u64,
}

impl ChainId {
    /// ```
    /// use ibc_query_types::identifiers::ChainId;
    ///
    /// let id = ChainId::new("cosmoshub-4").unwrap();
    /// assert_eq!(id.revision_number(), 4);
    ///
    /// let id = ChainId::new("testing").unwrap();
    /// assert_eq!(id.revision_number(), 0);
    /// ```
    pub fn new(chain_id: &str) -> Result<Self, IdentifierError> {
        Self::from_str(chain_id)
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn revision_number(&self) -> u64 {
        self.revision_number
    }
}

impl FromStr for ChainId {
    type Err = IdentifierError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        validate_identifier_chars(id)?;

        match split_revision(id) {
            Some((chain_name, revision_number)) => {
                validate_prefix_length(chain_name, 1, 64)?;
                Ok(Self {
                    id: id.into(),
                    revision_number,
                })
            }
            None => {
                validate_identifier_length(id, 1, 64)?;
                Ok(Self {
                    id: id.into(),
                    revision_number: 0,
                })
            }
        }
    }
}

impl TryFrom<String> for ChainId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<ChainId> for String {
    fn from(chain_id: ChainId) -> String {
        chain_id.id
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.id)
    }
}

/// Splits `{chain name}-{revision number}`. Revision numbers with leading
/// zeros are not recognized.
fn split_revision(chain_id: &str) -> Option<(&str, u64)> {
    let (chain_name, revision) = chain_id.rsplit_once('-')?;
    if revision.starts_with('0') && revision.len() > 1 {
        return None;
    }
    revision.parse().ok().map(|number| (chain_name, number))
}
