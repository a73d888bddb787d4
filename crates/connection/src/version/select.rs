//! Helpers for matching and selecting a connection version with a counterparty.

use std::borrow::Cow;

use super::advertisement::VersionAdvertisement;
use super::codec::Version;
use super::policy::FeatureSetPolicy;
use crate::error::NegotiationError;

/// Finds the entry in `supported` that shares `candidate`'s identifier.
///
/// The first identifier match wins and the entry is returned as it appears in
/// `supported`, so its own feature set is authoritative. A candidate that
/// fails to decode, an empty list, or a list without a matching identifier
/// all yield `None`. Malformed entries inside `supported` are skipped.
///
/// # Examples
///
/// ```
/// use connection::find_supported_version;
///
/// let supported = ["(2,[DAG])", "(1,[ORDERED,UNORDERED])"];
/// let found = find_supported_version("(1,[features])", &supported).expect("identifier 1");
/// assert_eq!(found.to_string(), "(1,[ORDERED,UNORDERED])");
///
/// assert!(find_supported_version("(3,[])", &supported).is_none());
/// ```
#[must_use]
pub fn find_supported_version<C, S>(candidate: &C, supported: &[S]) -> Option<Version>
where
    C: VersionAdvertisement + ?Sized,
    S: VersionAdvertisement,
{
    match candidate.to_version() {
        Ok(candidate) => find_by_identifier(&candidate, supported).map(Cow::into_owned),
        Err(err) => {
            logging::trace_negotiate!(error = %err, "candidate version is malformed");
            None
        }
    }
}

fn find_by_identifier<'a, S>(candidate: &Version, supported: &'a [S]) -> Option<Cow<'a, Version>>
where
    S: VersionAdvertisement,
{
    supported
        .iter()
        .find_map(|entry| match entry.to_version() {
            Ok(version) if version.is_identifier_equal(candidate) => Some(version),
            Ok(_) => None,
            Err(err) => {
                logging::trace_negotiate!(error = %err, "skipping malformed version entry");
                None
            }
        })
}

/// Returns the features present in both sets, ordered as in `ours` and
/// without duplicates.
#[must_use]
pub fn feature_set_intersection<A, B>(ours: &[A], theirs: &[B]) -> Vec<String>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut shared: Vec<String> = Vec::with_capacity(ours.len().min(theirs.len()));
    for feature in ours {
        let feature = feature.as_ref();
        let offered = theirs.iter().any(|other| other.as_ref() == feature);
        if offered && !shared.iter().any(|kept| kept == feature) {
            shared.push(feature.to_owned());
        }
    }
    shared
}

/// Selects the connection version both parties accept.
///
/// `own_supported` is walked in order, so the caller's list expresses its
/// preference. For every entry the counterparty's offer is searched for the
/// same identifier; the negotiated features are the intersection of both
/// feature sets. The first entry whose intersection is non-empty, or whose
/// identifier the `policy` allows to be empty, is returned immediately.
/// Entries that fail that test are disqualified and never retried, and
/// malformed entries on either side are treated as non-matching.
///
/// Returns [`NegotiationError::NoCandidates`] when either list is empty and
/// [`NegotiationError::NoCompatibleVersion`] when no entry qualifies.
///
/// # Examples
///
/// ```
/// use connection::{FeatureSetPolicy, pick_version};
///
/// let ours = ["(1,[ORDERED,UNORDERED])"];
/// let theirs = ["(2.0.0,[DAG,ZK])", "(1,[UNORDERED])"];
/// let picked = pick_version(&ours, &theirs, &FeatureSetPolicy::default_connection())?;
/// assert_eq!(picked.to_string(), "(1,[UNORDERED])");
/// # Ok::<_, connection::NegotiationError>(())
/// ```
#[must_use = "the negotiation outcome must be checked"]
pub fn pick_version<A, B>(
    own_supported: &[A],
    counterparty_offered: &[B],
    policy: &FeatureSetPolicy,
) -> Result<Version, NegotiationError>
where
    A: VersionAdvertisement,
    B: VersionAdvertisement,
{
    if own_supported.is_empty() || counterparty_offered.is_empty() {
        logging::trace_negotiate!(
            own = own_supported.len(),
            counterparty = counterparty_offered.len(),
            "nothing to negotiate"
        );
        return Err(NegotiationError::NoCandidates);
    }

    for entry in own_supported {
        let own = match entry.to_version() {
            Ok(own) => own,
            Err(err) => {
                logging::trace_negotiate!(error = %err, "skipping malformed supported version");
                continue;
            }
        };

        let Some(counterpart) = find_by_identifier(&own, counterparty_offered) else {
            logging::trace_negotiate!(
                identifier = own.identifier(),
                "identifier not offered by counterparty"
            );
            continue;
        };

        let features = feature_set_intersection(own.features(), counterpart.features());
        if !features.is_empty() || policy.is_empty_feature_set_allowed(own.identifier()) {
            let picked = Version::from_parts(own.identifier().to_owned(), features);
            logging::trace_negotiate!(version = %picked, "negotiated connection version");
            return Ok(picked);
        }

        logging::trace_negotiate!(
            identifier = own.identifier(),
            "identifier disqualified: empty feature intersection not allowed"
        );
    }

    Err(NegotiationError::NoCompatibleVersion {
        counterparty_versions: counterparty_offered
            .iter()
            .map(|offer| offer.advertised().into_owned())
            .collect(),
    })
}
