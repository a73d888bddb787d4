//! Confirmation-time checks on a version proposed by the counterparty.

use super::advertisement::VersionAdvertisement;
use super::policy::FeatureSetPolicy;
use crate::error::VerificationError;

/// Checks that `proposed` is an acceptable narrowing of `agreed`.
///
/// The proposal must carry the same identifier as `agreed`, every proposed
/// feature must be present in `agreed`, and an empty proposal is only
/// accepted when `policy` allows it for the identifier. Membership checks are
/// order independent.
pub fn check_proposed_feature_set<P, S>(
    proposed: &P,
    agreed: &S,
    policy: &FeatureSetPolicy,
) -> Result<(), VerificationError>
where
    P: VersionAdvertisement + ?Sized,
    S: VersionAdvertisement + ?Sized,
{
    let proposed = proposed.to_version()?;
    let agreed = agreed.to_version()?;

    if !proposed.is_identifier_equal(&agreed) {
        return Err(VerificationError::IdentifierMismatch {
            proposed: proposed.identifier().to_owned(),
            agreed: agreed.identifier().to_owned(),
        });
    }

    if let Some(feature) = proposed
        .features()
        .iter()
        .find(|feature| !agreed.has_feature(feature))
    {
        return Err(VerificationError::UnsupportedFeature {
            feature: feature.clone(),
            agreed: agreed.to_string(),
        });
    }

    if proposed.features().is_empty() && !policy.is_empty_feature_set_allowed(proposed.identifier())
    {
        return Err(VerificationError::EmptyFeatureSetNotAllowed {
            identifier: proposed.identifier().to_owned(),
        });
    }

    Ok(())
}

/// Reports whether `proposed` is an acceptable narrowing of `agreed`.
///
/// This is the predicate form of [`check_proposed_feature_set`]: malformed
/// input, identifier mismatches, unknown features, and disallowed empty
/// feature sets all yield `false`.
///
/// # Examples
///
/// ```
/// use connection::{FeatureSetPolicy, verify_proposed_feature_set};
///
/// let policy = FeatureSetPolicy::default_connection();
/// assert!(verify_proposed_feature_set(
///     "(1,[ORDERED])",
///     "(1,[ORDERED,UNORDERED])",
///     &policy,
/// ));
/// assert!(!verify_proposed_feature_set("(1,[])", "(1,[ORDERED])", &policy));
/// ```
#[must_use]
pub fn verify_proposed_feature_set<P, S>(
    proposed: &P,
    agreed: &S,
    policy: &FeatureSetPolicy,
) -> bool
where
    P: VersionAdvertisement + ?Sized,
    S: VersionAdvertisement + ?Sized,
{
    match check_proposed_feature_set(proposed, agreed, policy) {
        Ok(()) => true,
        Err(err) => {
            logging::trace_verify!(
                proposed = %proposed.advertised(),
                error = %err,
                "refused proposed connection version"
            );
            false
        }
    }
}
