use std::io;

use thiserror::Error;

use crate::version::VersionError;

/// Errors that can occur while negotiating a connection version.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum NegotiationError {
    /// Either our supported list or the counterparty's offer was empty.
    #[error("connection version negotiation requires non-empty version lists on both sides")]
    NoCandidates,
    /// No identifier we support was offered with an acceptable feature set.
    #[error("no compatible connection version; counterparty offered {counterparty_versions:?}")]
    NoCompatibleVersion {
        /// Versions offered by the counterparty, as they appeared on the wire.
        counterparty_versions: Vec<String>,
    },
}

impl NegotiationError {
    /// Returns the counterparty offer that failed to produce a compatible
    /// version.
    ///
    /// Exposing the slice lets the handshake layer echo the offer in its abort
    /// response without cloning the vector held by the error.
    #[must_use]
    pub fn counterparty_versions(&self) -> Option<&[String]> {
        match self {
            Self::NoCompatibleVersion {
                counterparty_versions,
            } => Some(counterparty_versions.as_slice()),
            Self::NoCandidates => None,
        }
    }
}

impl From<NegotiationError> for io::Error {
    fn from(err: NegotiationError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// Reasons a proposed version is refused during handshake confirmation.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum VerificationError {
    /// One of the two versions failed to decode.
    #[error(transparent)]
    Malformed(#[from] VersionError),
    /// The proposal names a different identifier than the agreed version.
    #[error("proposed version identifier {proposed:?} does not match agreed identifier {agreed:?}")]
    IdentifierMismatch {
        /// Identifier of the proposed version.
        proposed: String,
        /// Identifier of the agreed version.
        agreed: String,
    },
    /// The proposal carries a feature the agreed version does not.
    #[error("proposed feature {feature:?} is not part of agreed version {agreed}")]
    UnsupportedFeature {
        /// The first offending feature.
        feature: String,
        /// The agreed version in canonical form.
        agreed: String,
    },
    /// The proposal has no features and the policy forbids that for its
    /// identifier.
    #[error("empty feature set is not allowed for connection version identifier {identifier:?}")]
    EmptyFeatureSetNotAllowed {
        /// Identifier of the proposed version.
        identifier: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_counterparty_offer() {
        let err = NegotiationError::NoCompatibleVersion {
            counterparty_versions: vec!["(2,[DAG])".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "no compatible connection version; counterparty offered [\"(2,[DAG])\"]"
        );
    }

    #[test]
    fn accessors_expose_variant_context() {
        let err = NegotiationError::NoCompatibleVersion {
            counterparty_versions: vec!["(2,[])".to_owned()],
        };
        assert_eq!(err.counterparty_versions(), Some(&["(2,[])".to_owned()][..]));
        assert_eq!(NegotiationError::NoCandidates.counterparty_versions(), None);
    }

    #[test]
    fn converts_to_io_error_preserving_kind_and_source() {
        let err = NegotiationError::NoCandidates;
        let io_err: io::Error = err.clone().into();

        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
        let source = io_err
            .get_ref()
            .and_then(|src| src.downcast_ref::<NegotiationError>())
            .expect("io::Error must carry NegotiationError source");
        assert_eq!(source, &err);
    }

    #[test]
    fn malformed_verification_wraps_version_error() {
        let version_err = VersionError::InvalidFormat {
            input: "bad".to_owned(),
        };
        let err = VerificationError::from(version_err.clone());
        assert_eq!(err.to_string(), version_err.to_string());
    }

    #[test]
    fn empty_feature_set_display_names_identifier() {
        let err = VerificationError::EmptyFeatureSetNotAllowed {
            identifier: "1".to_owned(),
        };
        assert!(err.to_string().contains("\"1\""));
    }
}
