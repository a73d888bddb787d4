#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! Connection version negotiation for a multi-step cross-chain handshake.
//!
//! Each side of the handshake advertises an ordered list of versions; a version
//! is an identifier plus a set of optional features. This crate provides the
//! string codec for versions, identifier lookup across lists, the negotiation
//! run by the responding side, and the feature-set check run by the confirming
//! side. Handshake messages that carry versions are modelled in [`msgs`].
//!
//! # Examples
//!
//! The responder picks a version from the initiator's offer using its own
//! preference order:
//!
//! ```
//! use connection::{FeatureSetPolicy, pick_version};
//!
//! let ours = ["(1,[ORDERED,UNORDERED])"];
//! let offered = ["(2.0.0,[DAG,ZK])", "(1,[ORDERED,UNORDERED])"];
//! let policy = FeatureSetPolicy::default_connection();
//!
//! let picked = pick_version(&ours, &offered, &policy)?;
//! assert_eq!(picked.to_string(), "(1,[ORDERED,UNORDERED])");
//! # Ok::<_, connection::NegotiationError>(())
//! ```
//!
//! The initiator then confirms the echoed version narrows what it offered:
//!
//! ```
//! use connection::{FeatureSetPolicy, verify_proposed_feature_set};
//!
//! let policy = FeatureSetPolicy::default_connection();
//! assert!(verify_proposed_feature_set(
//!     "(1,[ORDERED])",
//!     "(1,[ORDERED,UNORDERED])",
//!     &policy,
//! ));
//! assert!(!verify_proposed_feature_set(
//!     "(1,[ORDERED,DAG])",
//!     "(1,[ORDERED,UNORDERED])",
//!     &policy,
//! ));
//! ```

mod config;
mod error;
pub mod msgs;
mod version;

pub use config::{ConfigError, NegotiationConfig};
pub use error::{NegotiationError, VerificationError};
pub use version::{
    DEFAULT_CONNECTION_VERSION, DEFAULT_FEATURES, DEFAULT_IDENTIFIER, FeatureSetPolicy, Version,
    VersionAdvertisement, VersionError, check_proposed_feature_set, decode_version,
    encode_version, feature_set_intersection, find_supported_version, pick_version,
    verify_proposed_feature_set,
};
