//! Canonical string form of connection versions.
//!
//! A version travels as `"(<identifier>,[<feature>,<feature>,...])"`. The
//! grammar is positional: the text between the opening parenthesis and the
//! first comma is the identifier, and the bracketed tail is a comma separated
//! feature list. Neither part may contain the delimiter characters, so the
//! codec never needs escaping.

use ::core::fmt::{self, Write as FmtWrite};
use std::io;
use std::str::FromStr;

use thiserror::Error;

const VERSION_OPEN: char = '(';
const VERSION_CLOSE: char = ')';
const FEATURES_OPEN: char = '[';
const FEATURES_CLOSE: char = ']';
const SEPARATOR: char = ',';

/// Errors produced when a connection version string cannot be decoded.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum VersionError {
    /// The input does not follow the `(identifier,[feature,...])` grammar.
    #[error("malformed connection version {input:?}: expected \"(identifier,[feature,...])\"")]
    InvalidFormat {
        /// The rejected input.
        input: String,
    },
    /// The identifier portion is empty or consists solely of whitespace.
    #[error("connection version {input:?} has a blank identifier")]
    EmptyIdentifier {
        /// The rejected input.
        input: String,
    },
}

impl VersionError {
    /// Returns the text that failed to decode.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::InvalidFormat { input } | Self::EmptyIdentifier { input } => input.as_str(),
        }
    }

    fn invalid_format(input: &str) -> Self {
        Self::InvalidFormat {
            input: input.to_owned(),
        }
    }
}

impl From<VersionError> for io::Error {
    fn from(err: VersionError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// A negotiable connection version: an identifier plus its optional features.
///
/// Feature order is kept for serialization, while every membership check the
/// negotiation helpers perform treats the features as a set. Two versions are
/// identifier-equal when their identifiers match byte for byte, regardless of
/// their features; see [`Version::is_identifier_equal`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Version {
    identifier: String,
    features: Vec<String>,
}

impl Version {
    /// Builds a version after checking that the identifier is non-empty and
    /// free of parentheses, brackets, commas, and control characters, and
    /// that no feature is empty or contains `,`, `[`, `]`, or `)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use connection::Version;
    ///
    /// let version = Version::new("1", ["ORDERED", "UNORDERED"])?;
    /// assert_eq!(version.to_string(), "(1,[ORDERED,UNORDERED])");
    /// # Ok::<_, connection::VersionError>(())
    /// ```
    pub fn new<I, F>(identifier: impl Into<String>, features: I) -> Result<Self, VersionError>
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let identifier = identifier.into();
        let features: Vec<String> = features.into_iter().map(Into::into).collect();

        if identifier.trim().is_empty() {
            return Err(VersionError::EmptyIdentifier {
                input: encode_version(&identifier, &features),
            });
        }
        if !is_valid_identifier(&identifier) || !features.iter().all(|f| is_valid_token(f)) {
            return Err(VersionError::InvalidFormat {
                input: encode_version(&identifier, &features),
            });
        }

        Ok(Self {
            identifier,
            features,
        })
    }

    /// Assembles a version from parts that were already validated.
    pub(crate) fn from_parts(identifier: String, features: Vec<String>) -> Self {
        debug_assert!(is_valid_identifier(&identifier));
        debug_assert!(features.iter().all(|f| is_valid_token(f)));
        Self {
            identifier,
            features,
        }
    }

    /// Returns the version identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the features in their advertised order.
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Reports whether `feature` is part of this version's feature set.
    #[must_use]
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|candidate| candidate == feature)
    }

    /// Reports whether both versions carry the same identifier.
    #[must_use]
    pub fn is_identifier_equal(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }

    /// Consumes the version and returns its identifier and features.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.identifier, self.features)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_version(f, &self.identifier, &self.features)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_version(s)
    }
}

impl TryFrom<&str> for Version {
    type Error = VersionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        decode_version(value)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        decode_version(&value)
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        decode_version(&raw).map_err(serde::de::Error::custom)
    }
}

/// Renders `identifier` and `features` in the canonical version form.
///
/// ```
/// use connection::encode_version;
///
/// assert_eq!(encode_version("1", &["ORDERED"]), "(1,[ORDERED])");
/// assert_eq!(encode_version::<&str>("1", &[]), "(1,[])");
/// ```
#[must_use]
pub fn encode_version<S: AsRef<str>>(identifier: &str, features: &[S]) -> String {
    let capacity = identifier.len()
        + features.iter().map(|f| f.as_ref().len() + 1).sum::<usize>()
        + 5;
    let mut rendered = String::with_capacity(capacity);
    // Writing into a String cannot fail.
    let _ = write_version(&mut rendered, identifier, features);
    rendered
}

/// Parses a version from its canonical string form.
///
/// # Examples
///
/// ```
/// use connection::{decode_version, VersionError};
///
/// let version = decode_version("(1,[ORDERED channel,UNORDERED channel])")?;
/// assert_eq!(version.identifier(), "1");
/// assert_eq!(version.features(), ["ORDERED channel", "UNORDERED channel"]);
///
/// assert!(matches!(
///     decode_version("(,[features])"),
///     Err(VersionError::EmptyIdentifier { .. })
/// ));
/// # Ok::<_, VersionError>(())
/// ```
pub fn decode_version(raw: &str) -> Result<Version, VersionError> {
    let result = decode_parts(raw);
    if let Err(err) = &result {
        logging::trace_codec!(input = raw, error = %err, "rejected connection version");
    }
    result
}

fn decode_parts(raw: &str) -> Result<Version, VersionError> {
    if raw.trim().is_empty() {
        return Err(VersionError::invalid_format(raw));
    }

    let inner = raw
        .strip_prefix(VERSION_OPEN)
        .and_then(|rest| rest.strip_suffix(VERSION_CLOSE))
        .ok_or_else(|| VersionError::invalid_format(raw))?;
    let (identifier, feature_list) = inner
        .split_once(SEPARATOR)
        .ok_or_else(|| VersionError::invalid_format(raw))?;

    if identifier.trim().is_empty() {
        return Err(VersionError::EmptyIdentifier {
            input: raw.to_owned(),
        });
    }
    if !is_valid_identifier(identifier) {
        return Err(VersionError::invalid_format(raw));
    }

    let features = feature_list
        .strip_prefix(FEATURES_OPEN)
        .and_then(|rest| rest.strip_suffix(FEATURES_CLOSE))
        .ok_or_else(|| VersionError::invalid_format(raw))?;

    let features = if features.is_empty() {
        Vec::new()
    } else {
        features
            .split(SEPARATOR)
            .map(|feature| {
                if is_valid_token(feature) {
                    Ok(feature.to_owned())
                } else {
                    Err(VersionError::invalid_format(raw))
                }
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(Version {
        identifier: identifier.to_owned(),
        features,
    })
}

fn write_version<W, S>(out: &mut W, identifier: &str, features: &[S]) -> fmt::Result
where
    W: FmtWrite + ?Sized,
    S: AsRef<str>,
{
    out.write_char(VERSION_OPEN)?;
    out.write_str(identifier)?;
    out.write_char(SEPARATOR)?;
    out.write_char(FEATURES_OPEN)?;
    for (index, feature) in features.iter().enumerate() {
        if index > 0 {
            out.write_char(SEPARATOR)?;
        }
        out.write_str(feature.as_ref())?;
    }
    out.write_char(FEATURES_CLOSE)?;
    out.write_char(VERSION_CLOSE)
}

/// Identifiers and features must be non-empty and must not contain a
/// character that terminates their position in the grammar.
pub(crate) fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && !token
            .chars()
            .any(|c| matches!(c, VERSION_CLOSE | FEATURES_OPEN | FEATURES_CLOSE | SEPARATOR))
}

/// Identifiers additionally exclude `(` and control characters.
pub(crate) fn is_valid_identifier(identifier: &str) -> bool {
    is_valid_token(identifier)
        && !identifier
            .chars()
            .any(|c| c == VERSION_OPEN || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_features_with_spaces() {
        let version = decode_version("(1,[ORDERED channel,UNORDERED channel])").expect("valid");
        assert_eq!(version.identifier(), "1");
        assert_eq!(version.features(), ["ORDERED channel", "UNORDERED channel"]);
    }

    #[test]
    fn decodes_empty_feature_list() {
        let version = decode_version("(1,[])").expect("valid");
        assert_eq!(version.identifier(), "1");
        assert!(version.features().is_empty());
    }

    #[test]
    fn rejects_blank_identifier() {
        for input in ["(,[features])", "(   ,[features])"] {
            let err = decode_version(input).unwrap_err();
            assert_eq!(
                err,
                VersionError::EmptyIdentifier {
                    input: input.to_owned()
                }
            );
        }
    }

    #[test]
    fn rejects_missing_parentheses() {
        let err = decode_version("identifier,[features]").unwrap_err();
        assert!(matches!(err, VersionError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_empty_and_whitespace_input() {
        assert!(matches!(
            decode_version(""),
            Err(VersionError::InvalidFormat { .. })
        ));
        assert!(matches!(
            decode_version("  "),
            Err(VersionError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn rejects_missing_feature_brackets() {
        assert!(decode_version("(1,ORDERED)").is_err());
        assert!(decode_version("(1,[ORDERED)").is_err());
        assert!(decode_version("(1)").is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(decode_version("(1,[ORDERED])x").is_err());
        assert!(decode_version("(1,[ORDERED]))").is_err());
    }

    #[test]
    fn rejects_delimiters_inside_identifier() {
        assert!(decode_version("(1],[ORDERED])").is_err());
        assert!(decode_version("(1[,[ORDERED])").is_err());
        assert!(decode_version("(1),[ORDERED])").is_err());
    }

    #[test]
    fn rejects_empty_feature_entries() {
        assert!(decode_version("(1,[ORDERED,,UNORDERED])").is_err());
        assert!(decode_version("(1,[ORDERED,])").is_err());
    }

    #[test]
    fn rejects_parenthesis_and_control_characters_in_identifier() {
        for input in ["((1,[A])", "(a(b,[A])", "(\n1,[A])", "(1\u{7},[A])", "(1\t,[A])"] {
            assert_eq!(
                decode_version(input),
                Err(VersionError::InvalidFormat {
                    input: input.to_owned()
                }),
                "{input:?}"
            );
        }
    }

    #[test]
    fn constructor_applies_identifier_rules() {
        for identifier in ["a(b", "1\n", "\u{7}1", "a)b", "a[b", "a,b"] {
            assert!(
                matches!(
                    Version::new(identifier, ["A"]),
                    Err(VersionError::InvalidFormat { .. })
                ),
                "{identifier:?}"
            );
        }
    }

    #[test]
    fn features_may_contain_opening_parenthesis() {
        let version = decode_version("(1,[ORD(ERED])").expect("valid");
        assert_eq!(version.features(), ["ORD(ERED"]);
        assert_eq!(version.to_string(), "(1,[ORD(ERED])");
        assert!(decode_version("(1,[f(x)])").is_err());
    }

    #[test]
    fn encodes_canonical_form() {
        assert_eq!(
            encode_version("1", &["ORDERED", "UNORDERED"]),
            "(1,[ORDERED,UNORDERED])"
        );
        assert_eq!(encode_version::<String>("2", &[]), "(2,[])");
    }

    #[test]
    fn display_matches_encode() {
        let version = Version::new("1", ["DAG"]).expect("valid");
        assert_eq!(version.to_string(), encode_version("1", &["DAG"]));
    }

    #[test]
    fn new_rejects_delimiters() {
        assert!(matches!(
            Version::new("1,2", ["ORDERED"]),
            Err(VersionError::InvalidFormat { .. })
        ));
        assert!(matches!(
            Version::new("1", ["ORD]ERED"]),
            Err(VersionError::InvalidFormat { .. })
        ));
        assert!(matches!(
            Version::new(" ", ["ORDERED"]),
            Err(VersionError::EmptyIdentifier { .. })
        ));
    }

    #[test]
    fn identifier_equality_ignores_features() {
        let left = Version::new("1", ["ORDERED"]).expect("valid");
        let right = Version::new("1", ["DAG"]).expect("valid");
        let other = Version::new("2", ["ORDERED"]).expect("valid");
        assert!(left.is_identifier_equal(&right));
        assert!(!left.is_identifier_equal(&other));
    }

    #[test]
    fn parses_through_from_str() {
        let version: Version = "(1,[ORDERED])".parse().expect("valid");
        assert!(version.has_feature("ORDERED"));
        assert!(!version.has_feature("UNORDERED"));
    }

    #[test]
    fn error_exposes_input() {
        let err = decode_version("nope").unwrap_err();
        assert_eq!(err.input(), "nope");
        assert!(err.to_string().contains("\"nope\""));
    }

    #[test]
    fn converts_to_io_error() {
        let err = decode_version("nope").unwrap_err();
        let io_err: io::Error = err.clone().into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
        let source = io_err
            .get_ref()
            .and_then(|src| src.downcast_ref::<VersionError>())
            .expect("io::Error must carry VersionError source");
        assert_eq!(source, &err);
    }
}
