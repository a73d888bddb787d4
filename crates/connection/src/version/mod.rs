//! Connection version representation, matching, and negotiation.
//!
//! This module provides [`Version`], an identifier plus an ordered set of
//! optional features, together with its canonical string codec
//! ([`encode_version`], [`decode_version`]), identifier lookup across version
//! lists ([`find_supported_version`]), and the two algorithms run during the
//! handshake: [`pick_version`] on the responding side and
//! [`verify_proposed_feature_set`] on the confirming side.
//!
//! Whether an empty negotiated feature set is acceptable is decided per
//! identifier by a [`FeatureSetPolicy`].

mod advertisement;
mod codec;
mod constants;
mod policy;
mod select;
mod verify;

pub use advertisement::VersionAdvertisement;
pub use codec::{Version, VersionError, decode_version, encode_version};
pub use constants::{DEFAULT_CONNECTION_VERSION, DEFAULT_FEATURES, DEFAULT_IDENTIFIER};
pub use policy::FeatureSetPolicy;
pub use select::{feature_set_intersection, find_supported_version, pick_version};
pub use verify::{check_proposed_feature_set, verify_proposed_feature_set};

impl Version {
    /// Returns the default connection version, `(1,[ORDERED,UNORDERED])`.
    #[must_use]
    pub fn default_connection() -> Self {
        Self::from_parts(
            DEFAULT_IDENTIFIER.to_owned(),
            DEFAULT_FEATURES.iter().map(|f| (*f).to_owned()).collect(),
        )
    }
}
