//! Connection handshake messages and their stateless validation.
//!
//! The four handshake steps are modelled as the closed [`HandshakeMsg`] enum.
//! Each variant carries its own typed payload and is validated by a single
//! exhaustive [`HandshakeMsg::validate_basic`] match. Validation only checks
//! field well-formedness: proofs and signers are opaque byte strings whose
//! emptiness is the only property inspected here.

mod identifier;

use thiserror::Error;

pub use identifier::{
    CLIENT_ID_LENGTH, CONNECTION_ID_LENGTH, IdentifierError, validate_client_identifier,
    validate_connection_identifier,
};

use crate::config::NegotiationConfig;
use crate::error::NegotiationError;
use crate::version::{Version, VersionError, decode_version};

/// Router key shared by every handshake message.
pub const ROUTER_KEY: &str = "ibc";

/// Errors reported by [`HandshakeMsg::validate_basic`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MsgError {
    /// An identifier field is malformed.
    #[error("invalid {field} {value:?}: {source}")]
    InvalidIdentifier {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Why the identifier was rejected.
        #[source]
        source: IdentifierError,
    },
    /// An open-try message offered no versions.
    #[error("missing counterparty versions")]
    MissingCounterpartyVersions,
    /// A version field failed to decode.
    #[error("invalid {field}: {source}")]
    InvalidVersion {
        /// Name of the offending field.
        field: &'static str,
        /// The decoding failure.
        #[source]
        source: VersionError,
    },
    /// A proof field is empty.
    #[error("cannot submit an empty {0}")]
    EmptyProof(&'static str),
    /// A height field is zero.
    #[error("{0} must be > 0")]
    ZeroHeight(&'static str),
    /// The signer address is empty.
    #[error("signer address cannot be empty")]
    EmptySigner,
    /// The counterparty commitment prefix is empty.
    #[error("counterparty prefix cannot be empty")]
    EmptyPrefix,
}

/// Address of the account submitting a handshake message.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Signer(Vec<u8>);

impl Signer {
    /// Wraps raw address bytes.
    #[must_use]
    pub fn new(address: impl Into<Vec<u8>>) -> Self {
        Self(address.into())
    }

    /// Returns the address bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Reports whether the address is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The other chain's view of the connection.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counterparty {
    /// Client identifier on the counterparty chain.
    pub client_id: String,
    /// Connection identifier on the counterparty chain.
    pub connection_id: String,
    /// Commitment prefix of the counterparty store.
    pub prefix: Vec<u8>,
}

impl Counterparty {
    /// Creates a counterparty description.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        connection_id: impl Into<String>,
        prefix: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            connection_id: connection_id.into(),
            prefix: prefix.into(),
        }
    }

    /// Checks identifier well-formedness and a non-empty prefix.
    pub fn validate_basic(&self) -> Result<(), MsgError> {
        check_connection_id("counterparty connection ID", &self.connection_id)?;
        check_client_id("counterparty client ID", &self.client_id)?;
        if self.prefix.is_empty() {
            return Err(MsgError::EmptyPrefix);
        }
        Ok(())
    }
}

/// First handshake step: the initiator proposes a connection.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenInit {
    /// Connection identifier on the initiating chain.
    pub connection_id: String,
    /// Client identifier on the initiating chain.
    pub client_id: String,
    /// The counterparty's view of the connection.
    pub counterparty: Counterparty,
    /// Submitting account.
    pub signer: Signer,
}

/// Second handshake step: the responder answers with the initiator's offer.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenTry {
    /// Connection identifier on the responding chain.
    pub connection_id: String,
    /// Client identifier on the responding chain.
    pub client_id: String,
    /// The counterparty's view of the connection.
    pub counterparty: Counterparty,
    /// Versions offered by the initiator, as sent on the wire.
    pub counterparty_versions: Vec<String>,
    /// Proof of the initiator's connection state.
    pub proof_init: Vec<u8>,
    /// Proof of the initiator's consensus state.
    pub proof_consensus: Vec<u8>,
    /// Height at which `proof_init` was produced.
    pub proof_height: u64,
    /// Height of the consensus state proven by `proof_consensus`.
    pub consensus_height: u64,
    /// Submitting account.
    pub signer: Signer,
}

/// Third handshake step: the initiator acknowledges the negotiated version.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenAck {
    /// Connection identifier on the initiating chain.
    pub connection_id: String,
    /// Version selected by the responder.
    pub version: String,
    /// Proof of the responder's connection state.
    pub proof_try: Vec<u8>,
    /// Proof of the responder's consensus state.
    pub proof_consensus: Vec<u8>,
    /// Height at which `proof_try` was produced.
    pub proof_height: u64,
    /// Height of the consensus state proven by `proof_consensus`.
    pub consensus_height: u64,
    /// Submitting account.
    pub signer: Signer,
}

/// Final handshake step: the responder confirms the connection is open.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenConfirm {
    /// Connection identifier on the responding chain.
    pub connection_id: String,
    /// Proof of the initiator's acknowledged connection state.
    pub proof_ack: Vec<u8>,
    /// Height at which `proof_ack` was produced.
    pub proof_height: u64,
    /// Submitting account.
    pub signer: Signer,
}

impl OpenTry {
    /// Negotiates the version to echo back to the initiator.
    pub fn pick_version(&self, config: &NegotiationConfig) -> Result<Version, NegotiationError> {
        config.pick(&self.counterparty_versions)
    }
}

impl OpenAck {
    /// Reports whether the version echoed by the responder narrows what we
    /// advertised for the same identifier.
    #[must_use]
    pub fn confirm_version(&self, config: &NegotiationConfig) -> bool {
        config.confirm(self.version.as_str())
    }
}

/// A connection handshake message.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type")
)]
pub enum HandshakeMsg {
    /// See [`OpenInit`].
    #[cfg_attr(feature = "serde", serde(rename = "connection_open_init"))]
    OpenInit(OpenInit),
    /// See [`OpenTry`].
    #[cfg_attr(feature = "serde", serde(rename = "connection_open_try"))]
    OpenTry(OpenTry),
    /// See [`OpenAck`].
    #[cfg_attr(feature = "serde", serde(rename = "connection_open_ack"))]
    OpenAck(OpenAck),
    /// See [`OpenConfirm`].
    #[cfg_attr(feature = "serde", serde(rename = "connection_open_confirm"))]
    OpenConfirm(OpenConfirm),
}

impl HandshakeMsg {
    /// Returns the router key every handshake message is dispatched under.
    #[must_use]
    pub const fn route(&self) -> &'static str {
        ROUTER_KEY
    }

    /// Returns the message type name.
    #[must_use]
    pub const fn msg_type(&self) -> &'static str {
        match self {
            Self::OpenInit(_) => "connection_open_init",
            Self::OpenTry(_) => "connection_open_try",
            Self::OpenAck(_) => "connection_open_ack",
            Self::OpenConfirm(_) => "connection_open_confirm",
        }
    }

    /// Returns the account that must sign the message.
    #[must_use]
    pub const fn signer(&self) -> &Signer {
        match self {
            Self::OpenInit(msg) => &msg.signer,
            Self::OpenTry(msg) => &msg.signer,
            Self::OpenAck(msg) => &msg.signer,
            Self::OpenConfirm(msg) => &msg.signer,
        }
    }

    /// Returns every account whose signature the message requires.
    #[must_use]
    pub const fn signers(&self) -> &[Signer] {
        std::slice::from_ref(self.signer())
    }

    /// Performs stateless validation of every field.
    pub fn validate_basic(&self) -> Result<(), MsgError> {
        let result = match self {
            Self::OpenInit(msg) => validate_open_init(msg),
            Self::OpenTry(msg) => validate_open_try(msg),
            Self::OpenAck(msg) => validate_open_ack(msg),
            Self::OpenConfirm(msg) => validate_open_confirm(msg),
        };
        if let Err(err) = &result {
            logging::trace_handshake!(msg_type = self.msg_type(), error = %err, "rejected handshake message");
        }
        result
    }
}

#[cfg(feature = "serde")]
impl HandshakeMsg {
    /// Returns the canonical bytes a signer commits to.
    ///
    /// The message is rendered as compact JSON with the `type` tag included
    /// and object keys sorted at every nesting level, so equal messages always
    /// produce identical bytes.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] raised while serializing the message.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        // `serde_json::Map` is ordered by key unless `preserve_order` is enabled.
        let canonical = serde_json::to_value(self)?;
        serde_json::to_vec(&canonical)
    }
}

impl From<OpenInit> for HandshakeMsg {
    fn from(msg: OpenInit) -> Self {
        Self::OpenInit(msg)
    }
}

impl From<OpenTry> for HandshakeMsg {
    fn from(msg: OpenTry) -> Self {
        Self::OpenTry(msg)
    }
}

impl From<OpenAck> for HandshakeMsg {
    fn from(msg: OpenAck) -> Self {
        Self::OpenAck(msg)
    }
}

impl From<OpenConfirm> for HandshakeMsg {
    fn from(msg: OpenConfirm) -> Self {
        Self::OpenConfirm(msg)
    }
}

fn validate_open_init(msg: &OpenInit) -> Result<(), MsgError> {
    check_connection_id("connection ID", &msg.connection_id)?;
    check_client_id("client ID", &msg.client_id)?;
    check_signer(&msg.signer)?;
    msg.counterparty.validate_basic()
}

fn validate_open_try(msg: &OpenTry) -> Result<(), MsgError> {
    check_connection_id("connection ID", &msg.connection_id)?;
    check_client_id("client ID", &msg.client_id)?;
    if msg.counterparty_versions.is_empty() {
        return Err(MsgError::MissingCounterpartyVersions);
    }
    for version in &msg.counterparty_versions {
        check_version("counterparty version", version)?;
    }
    check_proof("proof init", &msg.proof_init)?;
    check_proof("proof of consensus state", &msg.proof_consensus)?;
    check_height("proof height", msg.proof_height)?;
    check_height("consensus height", msg.consensus_height)?;
    check_signer(&msg.signer)?;
    msg.counterparty.validate_basic()
}

fn validate_open_ack(msg: &OpenAck) -> Result<(), MsgError> {
    check_connection_id("connection ID", &msg.connection_id)?;
    check_version("version", &msg.version)?;
    check_proof("proof try", &msg.proof_try)?;
    check_proof("proof of consensus state", &msg.proof_consensus)?;
    check_height("proof height", msg.proof_height)?;
    check_height("consensus height", msg.consensus_height)?;
    check_signer(&msg.signer)
}

fn validate_open_confirm(msg: &OpenConfirm) -> Result<(), MsgError> {
    check_connection_id("connection ID", &msg.connection_id)?;
    check_proof("proof ack", &msg.proof_ack)?;
    check_height("proof height", msg.proof_height)?;
    check_signer(&msg.signer)
}

fn check_connection_id(field: &'static str, value: &str) -> Result<(), MsgError> {
    validate_connection_identifier(value).map_err(|source| MsgError::InvalidIdentifier {
        field,
        value: value.to_owned(),
        source,
    })
}

fn check_client_id(field: &'static str, value: &str) -> Result<(), MsgError> {
    validate_client_identifier(value).map_err(|source| MsgError::InvalidIdentifier {
        field,
        value: value.to_owned(),
        source,
    })
}

fn check_version(field: &'static str, value: &str) -> Result<(), MsgError> {
    decode_version(value)
        .map(drop)
        .map_err(|source| MsgError::InvalidVersion { field, source })
}

fn check_proof(name: &'static str, proof: &[u8]) -> Result<(), MsgError> {
    if proof.is_empty() {
        Err(MsgError::EmptyProof(name))
    } else {
        Ok(())
    }
}

fn check_height(name: &'static str, height: u64) -> Result<(), MsgError> {
    if height == 0 {
        Err(MsgError::ZeroHeight(name))
    } else {
        Ok(())
    }
}

fn check_signer(signer: &Signer) -> Result<(), MsgError> {
    if signer.is_empty() {
        Err(MsgError::EmptySigner)
    } else {
        Ok(())
    }
}
