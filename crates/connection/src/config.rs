//! Negotiation configuration shared by every handshake.
//!
//! [`NegotiationConfig`] bundles the compatible-version list this side
//! advertises with the [`FeatureSetPolicy`] applied while negotiating and
//! confirming. The value is built once at startup, either from the defaults or
//! from a JSON document when the `serde` feature is enabled, and then passed by
//! reference into every handshake step. It is never mutated afterwards.

use thiserror::Error;

use crate::error::NegotiationError;
use crate::version::{
    FeatureSetPolicy, Version, VersionAdvertisement, find_supported_version, pick_version,
    verify_proposed_feature_set,
};

/// Errors produced while loading a [`NegotiationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration lists no compatible versions.
    #[error("negotiation configuration must list at least one compatible version")]
    NoCompatibleVersions,
    /// The configuration document could not be parsed.
    #[cfg(feature = "serde")]
    #[error("invalid negotiation configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The configuration document could not be read.
    #[error("failed to read negotiation configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Compatible versions and feature-set policy for one side of the handshake.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NegotiationConfig {
    compatible_versions: Vec<Version>,
    #[cfg_attr(feature = "serde", serde(default, rename = "allow_empty_feature_sets"))]
    policy: FeatureSetPolicy,
}

impl Default for NegotiationConfig {
    /// Advertises only the default connection version and denies it an empty
    /// feature set.
    fn default() -> Self {
        Self {
            compatible_versions: vec![Version::default_connection()],
            policy: FeatureSetPolicy::default_connection(),
        }
    }
}

impl NegotiationConfig {
    /// Creates a configuration from explicit parts.
    pub fn new(
        compatible_versions: Vec<Version>,
        policy: FeatureSetPolicy,
    ) -> Result<Self, ConfigError> {
        if compatible_versions.is_empty() {
            return Err(ConfigError::NoCompatibleVersions);
        }
        Ok(Self {
            compatible_versions,
            policy,
        })
    }

    /// Replaces the feature-set policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FeatureSetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the compatible versions in preference order.
    #[must_use]
    pub fn compatible_versions(&self) -> &[Version] {
        &self.compatible_versions
    }

    /// Returns the feature-set policy.
    #[must_use]
    pub const fn policy(&self) -> &FeatureSetPolicy {
        &self.policy
    }

    /// Looks up our compatible entry for `candidate`'s identifier.
    #[must_use]
    pub fn find_supported<C>(&self, candidate: &C) -> Option<Version>
    where
        C: VersionAdvertisement + ?Sized,
    {
        find_supported_version(candidate, &self.compatible_versions)
    }

    /// Negotiates against the counterparty's offered versions using our
    /// compatible list as the preference order.
    pub fn pick<B>(&self, counterparty_offered: &[B]) -> Result<Version, NegotiationError>
    where
        B: VersionAdvertisement,
    {
        pick_version(&self.compatible_versions, counterparty_offered, &self.policy)
    }

    /// Confirms a version echoed by the counterparty against the entry we
    /// advertised for the same identifier.
    ///
    /// Returns `false` when the proposal is malformed or names an identifier
    /// we never advertised.
    #[must_use]
    pub fn confirm<P>(&self, proposed: &P) -> bool
    where
        P: VersionAdvertisement + ?Sized,
    {
        match self.find_supported(proposed) {
            Some(advertised) => verify_proposed_feature_set(proposed, &advertised, &self.policy),
            None => false,
        }
    }
}

#[cfg(feature = "serde")]
impl NegotiationConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// ```
    /// use connection::NegotiationConfig;
    ///
    /// let config = NegotiationConfig::from_json_str(
    ///     r#"{"compatible_versions": ["(1,[ORDERED])"], "allow_empty_feature_sets": {"1": true}}"#,
    /// )?;
    /// assert_eq!(config.compatible_versions()[0].to_string(), "(1,[ORDERED])");
    /// assert!(config.policy().is_empty_feature_set_allowed("1"));
    /// # Ok::<_, connection::ConfigError>(())
    /// ```
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validated()
    }

    /// Parses a configuration from a JSON reader.
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validated()
    }

    /// Reads and parses a configuration file.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    fn validated(self) -> Result<Self, ConfigError> {
        Self::new(self.compatible_versions, self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{DEFAULT_CONNECTION_VERSION, DEFAULT_IDENTIFIER};

    #[test]
    fn default_advertises_default_connection_version() {
        let config = NegotiationConfig::default();
        assert_eq!(config.compatible_versions().len(), 1);
        assert_eq!(
            config.compatible_versions()[0].to_string(),
            DEFAULT_CONNECTION_VERSION
        );
        assert_eq!(config.policy().rule(DEFAULT_IDENTIFIER), Some(false));
    }

    #[test]
    fn rejects_empty_version_list() {
        assert!(matches!(
            NegotiationConfig::new(Vec::new(), FeatureSetPolicy::new()),
            Err(ConfigError::NoCompatibleVersions)
        ));
    }

    #[test]
    fn pick_uses_configured_preference() {
        let config = NegotiationConfig::new(
            vec![
                Version::new("2", ["DAG"]).expect("valid"),
                Version::default_connection(),
            ],
            FeatureSetPolicy::new(),
        )
        .expect("non-empty");

        let picked = config
            .pick(&[DEFAULT_CONNECTION_VERSION, "(2,[DAG,ZK])"])
            .expect("overlap");
        assert_eq!(picked.to_string(), "(2,[DAG])");
    }

    #[test]
    fn confirm_checks_against_advertised_entry() {
        let config = NegotiationConfig::default();
        assert!(config.confirm("(1,[ORDERED])"));
        assert!(!config.confirm("(1,[DAG])"));
        assert!(!config.confirm("(1,[])"));
        assert!(!config.confirm("(2,[ORDERED])"));
        assert!(!config.confirm("garbage"));
    }

    #[test]
    fn with_policy_replaces_rules() {
        let config =
            NegotiationConfig::default().with_policy(FeatureSetPolicy::new().with_rule("1", true));
        assert!(config.confirm("(1,[])"));
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[test]
        fn loads_json_document() {
            let config = NegotiationConfig::from_json_str(
                r#"{"compatible_versions": ["(2,[DAG])", "(1,[ORDERED,UNORDERED])"],
                    "allow_empty_feature_sets": {"2": true}}"#,
            )
            .expect("valid document");
            assert_eq!(config.compatible_versions().len(), 2);
            assert!(config.policy().is_empty_feature_set_allowed("2"));
            assert!(!config.policy().is_empty_feature_set_allowed("1"));
        }

        #[test]
        fn policy_defaults_to_empty() {
            let config =
                NegotiationConfig::from_json_str(r#"{"compatible_versions": ["(1,[])"]}"#)
                    .expect("valid document");
            assert!(config.policy().is_empty());
        }

        #[test]
        fn rejects_malformed_versions() {
            let err = NegotiationConfig::from_json_str(r#"{"compatible_versions": ["(1,[]"]}"#)
                .unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)));
            assert!(err.to_string().contains("malformed connection version"));
        }

        #[test]
        fn rejects_empty_version_list() {
            let err = NegotiationConfig::from_json_str(r#"{"compatible_versions": []}"#)
                .unwrap_err();
            assert!(matches!(err, ConfigError::NoCompatibleVersions));
        }

        #[test]
        fn missing_file_reports_io_error() {
            let err = NegotiationConfig::from_json_file("/nonexistent/connver.json").unwrap_err();
            assert!(matches!(err, ConfigError::Io(_)));
        }

        #[test]
        fn serializes_versions_as_strings() {
            let json = serde_json::to_string(&NegotiationConfig::default()).expect("serialize");
            assert!(json.contains(r#""compatible_versions":["(1,[ORDERED,UNORDERED])"]"#));
            let decoded = NegotiationConfig::from_json_str(&json).expect("round trip");
            assert_eq!(decoded, NegotiationConfig::default());
        }
    }
}
