//! Unpacking of `google.protobuf.Any` payloads.
//!
//! Which concrete type a packed payload decodes to is decided by an
//! [`InterfaceRegistry`]: one table per interface (client state, consensus
//! state, public key) mapping a type URL to a decoder. The registry is owned
//! by a [`ProtoCodec`] that callers construct and pass explicitly; nothing is
//! registered globally.

use core::fmt::Display;

use displaydoc::Display as DisplayDoc;
use ibc_proto::google::protobuf::Any;
use ibc_proto::ibc::lightclients::solomachine::v3::{
    ClientState as RawSmClientState, ConsensusState as RawSmConsensusState,
};
use ibc_proto::ibc::lightclients::tendermint::v1::{
    ClientState as RawTmClientState, ConsensusState as RawTmConsensusState,
};
use ibc_proto::Protobuf;
use prost::Message;

use crate::client::solomachine::{
    SmClientState, SmConsensusState, SOLOMACHINE_CLIENT_STATE_TYPE_URL,
    SOLOMACHINE_CONSENSUS_STATE_TYPE_URL,
};
use crate::client::tendermint::{
    TmClientState, TmConsensusState, TENDERMINT_CLIENT_STATE_TYPE_URL,
    TENDERMINT_CONSENSUS_STATE_TYPE_URL,
};
use crate::client::{AnyClientState, AnyConsensusState};
use crate::error::DecodingError;
use crate::prelude::*;
use crate::staking::pubkey::{
    decode_ed25519, decode_secp256k1, ConsensusPubKey, ED25519_PUB_KEY_TYPE_URL,
    SECP256K1_PUB_KEY_TYPE_URL,
};

pub type ClientStateDecoder = fn(&[u8]) -> Result<AnyClientState, DecodingError>;
pub type ConsensusStateDecoder = fn(&[u8]) -> Result<AnyConsensusState, DecodingError>;
pub type PublicKeyDecoder = fn(&[u8]) -> Result<ConsensusPubKey, DecodingError>;

/// The interfaces a packed payload can implement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interface {
    ClientState,
    ConsensusState,
    PublicKey,
}

impl Display for Interface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::ClientState => "ClientState",
            Self::ConsensusState => "ConsensusState",
            Self::PublicKey => "PubKey",
        };
        write!(f, "{name}")
    }
}

/// Type URL to decoder tables, one per [`Interface`].
#[derive(Clone, Debug)]
pub struct InterfaceRegistry {
    client_states: BTreeMap<String, ClientStateDecoder>,
    consensus_states: BTreeMap<String, ConsensusStateDecoder>,
    public_keys: BTreeMap<String, PublicKeyDecoder>,
}

impl InterfaceRegistry {
    /// A registry that knows no type at all.
    pub fn empty() -> Self {
        Self {
            client_states: BTreeMap::new(),
            consensus_states: BTreeMap::new(),
            public_keys: BTreeMap::new(),
        }
    }

    pub fn with_client_state(mut self, type_url: &str, decoder: ClientStateDecoder) -> Self {
        self.client_states.insert(type_url.to_string(), decoder);
        self
    }

    pub fn with_consensus_state(mut self, type_url: &str, decoder: ConsensusStateDecoder) -> Self {
        self.consensus_states.insert(type_url.to_string(), decoder);
        self
    }

    pub fn with_public_key(mut self, type_url: &str, decoder: PublicKeyDecoder) -> Self {
        self.public_keys.insert(type_url.to_string(), decoder);
        self
    }

    pub fn is_registered(&self, interface: Interface, type_url: &str) -> bool {
        match interface {
            Interface::ClientState => self.client_states.contains_key(type_url),
            Interface::ConsensusState => self.consensus_states.contains_key(type_url),
            Interface::PublicKey => self.public_keys.contains_key(type_url),
        }
    }
}

/// Registers the Tendermint and solo machine client types plus the ed25519
/// and secp256k1 consensus keys.
impl Default for InterfaceRegistry {
    fn default() -> Self {
        Self::empty()
            .with_client_state(
                TENDERMINT_CLIENT_STATE_TYPE_URL,
                decode_client_state::<TmClientState, RawTmClientState>,
            )
            .with_client_state(
                SOLOMACHINE_CLIENT_STATE_TYPE_URL,
                decode_client_state::<SmClientState, RawSmClientState>,
            )
            .with_consensus_state(
                TENDERMINT_CONSENSUS_STATE_TYPE_URL,
                decode_consensus_state::<TmConsensusState, RawTmConsensusState>,
            )
            .with_consensus_state(
                SOLOMACHINE_CONSENSUS_STATE_TYPE_URL,
                decode_consensus_state::<SmConsensusState, RawSmConsensusState>,
            )
            .with_public_key(ED25519_PUB_KEY_TYPE_URL, decode_ed25519)
            .with_public_key(SECP256K1_PUB_KEY_TYPE_URL, decode_secp256k1)
    }
}

/// Decodes the value of a packed client state of type `T`.
pub fn decode_client_state<T, Raw>(bytes: &[u8]) -> Result<AnyClientState, DecodingError>
where
    T: Protobuf<Raw> + Into<AnyClientState>,
    Raw: Message + Default + From<T>,
    <T as TryFrom<Raw>>::Error: Display,
{
    Ok(T::decode_vec(bytes)?.into())
}

/// Decodes the value of a packed consensus state of type `T`.
pub fn decode_consensus_state<T, Raw>(bytes: &[u8]) -> Result<AnyConsensusState, DecodingError>
where
    T: Protobuf<Raw> + Into<AnyConsensusState>,
    Raw: Message + Default + From<T>,
    <T as TryFrom<Raw>>::Error: Display,
{
    Ok(T::decode_vec(bytes)?.into())
}

/// Decodes protobuf bytes the caller itself produced.
///
/// # Panics
///
/// Panics if `bytes` is not a valid encoding of `T`.
pub fn must_decode<T, Raw>(bytes: &[u8]) -> T
where
    T: Protobuf<Raw>,
    Raw: Message + Default + From<T>,
    <T as TryFrom<Raw>>::Error: Display,
{
    match T::decode_vec(bytes) {
        Ok(value) => value,
        Err(e) => panic!("failed to decode {}: {e}", core::any::type_name::<T>()),
    }
}

/// Unpacks `Any` payloads through an [`InterfaceRegistry`].
#[derive(Clone, Debug, Default)]
pub struct ProtoCodec {
    registry: InterfaceRegistry,
}

impl ProtoCodec {
    pub fn new(registry: InterfaceRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &InterfaceRegistry {
        &self.registry
    }

    pub fn unpack_client_state(&self, any: &Any) -> Result<AnyClientState, UnpackError> {
        unpack(
            &self.registry.client_states,
            Interface::ClientState,
            any,
        )
    }

    pub fn unpack_consensus_state(&self, any: &Any) -> Result<AnyConsensusState, UnpackError> {
        unpack(
            &self.registry.consensus_states,
            Interface::ConsensusState,
            any,
        )
    }

    pub fn unpack_public_key(&self, any: &Any) -> Result<ConsensusPubKey, UnpackError> {
        unpack(&self.registry.public_keys, Interface::PublicKey, any)
    }
}

fn unpack<T>(
    table: &BTreeMap<String, fn(&[u8]) -> Result<T, DecodingError>>,
    interface: Interface,
    any: &Any,
) -> Result<T, UnpackError> {
    let decode = table
        .get(&any.type_url)
        .ok_or_else(|| UnpackError::UnregisteredTypeUrl {
            interface,
            type_url: any.type_url.clone(),
        })?;

    decode(&any.value).map_err(|error| UnpackError::Decoding {
        type_url: any.type_url.clone(),
        error,
    })
}

/// Errors raised while unpacking an `Any`.
#[derive(Debug, DisplayDoc)]
pub enum UnpackError {
    /// no `{interface}` implementation registered for type URL `{type_url}`
    UnregisteredTypeUrl {
        interface: Interface,
        type_url: String,
    },
    /// failed to decode payload of type `{type_url}`: {error}
    Decoding {
        type_url: String,
        error: DecodingError,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for UnpackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Decoding { error, .. } => Some(error),
            Self::UnregisteredTypeUrl { .. } => None,
        }
    }
}
