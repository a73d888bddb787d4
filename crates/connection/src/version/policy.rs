//! Per-identifier rules for empty negotiated feature sets.

use rustc_hash::FxHashMap;

use super::constants::DEFAULT_IDENTIFIER;

/// Records which version identifiers may settle on an empty feature set.
///
/// Identifiers without an explicit rule are denied, so an empty intersection
/// is only acceptable when the identifier has been allow-listed. The policy is
/// built once alongside the rest of the negotiation configuration and shared
/// by reference afterwards.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct FeatureSetPolicy {
    allow_empty: FxHashMap<String, bool>,
}

impl FeatureSetPolicy {
    /// Creates a policy without any rules; every identifier is denied.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the policy paired with the default connection version: the
    /// default identifier is explicitly denied an empty feature set.
    #[must_use]
    pub fn default_connection() -> Self {
        Self::new().with_rule(DEFAULT_IDENTIFIER, false)
    }

    /// Adds or replaces the rule for `identifier`.
    #[must_use]
    pub fn with_rule(mut self, identifier: impl Into<String>, allowed: bool) -> Self {
        self.set_rule(identifier, allowed);
        self
    }

    /// Adds or replaces the rule for `identifier` in place.
    pub fn set_rule(&mut self, identifier: impl Into<String>, allowed: bool) {
        self.allow_empty.insert(identifier.into(), allowed);
    }

    /// Returns the explicit rule for `identifier`, if one was recorded.
    #[must_use]
    pub fn rule(&self, identifier: &str) -> Option<bool> {
        self.allow_empty.get(identifier).copied()
    }

    /// Reports whether `identifier` may end up with an empty feature set.
    #[must_use]
    pub fn is_empty_feature_set_allowed(&self, identifier: &str) -> bool {
        self.rule(identifier).unwrap_or(false)
    }

    /// Returns the number of explicit rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allow_empty.len()
    }

    /// Reports whether the policy has no explicit rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allow_empty.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for FeatureSetPolicy {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        let mut policy = Self::new();
        policy.extend(iter);
        policy
    }
}

impl<S: Into<String>> Extend<(S, bool)> for FeatureSetPolicy {
    fn extend<T: IntoIterator<Item = (S, bool)>>(&mut self, iter: T) {
        for (identifier, allowed) in iter {
            self.set_rule(identifier, allowed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_identifiers_are_denied() {
        let policy = FeatureSetPolicy::new();
        assert!(!policy.is_empty_feature_set_allowed("1"));
        assert_eq!(policy.rule("1"), None);
        assert!(policy.is_empty());
    }

    #[test]
    fn explicit_rules_are_honoured() {
        let policy = FeatureSetPolicy::new()
            .with_rule("1", false)
            .with_rule("2", true);
        assert!(!policy.is_empty_feature_set_allowed("1"));
        assert!(policy.is_empty_feature_set_allowed("2"));
        assert!(!policy.is_empty_feature_set_allowed("3"));
        assert_eq!(policy.len(), 2);
    }

    #[test]
    fn later_rules_replace_earlier_ones() {
        let mut policy = FeatureSetPolicy::new().with_rule("1", true);
        policy.set_rule("1", false);
        assert_eq!(policy.rule("1"), Some(false));
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn default_connection_denies_default_identifier() {
        let policy = FeatureSetPolicy::default_connection();
        assert_eq!(policy.rule(DEFAULT_IDENTIFIER), Some(false));
    }

    #[test]
    fn collects_from_pairs() {
        let policy: FeatureSetPolicy = [("a", true), ("b", false)].into_iter().collect();
        assert!(policy.is_empty_feature_set_allowed("a"));
        assert!(!policy.is_empty_feature_set_allowed("b"));
    }
}
