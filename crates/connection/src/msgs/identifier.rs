//! Well-formedness checks for client and connection identifiers.

use std::ops::RangeInclusive;

use thiserror::Error;

/// Allowed length of a client identifier.
pub const CLIENT_ID_LENGTH: RangeInclusive<usize> = 9..=20;

/// Allowed length of a connection identifier.
pub const CONNECTION_ID_LENGTH: RangeInclusive<usize> = 10..=20;

/// Reasons an identifier is rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum IdentifierError {
    /// The identifier is empty or consists solely of whitespace.
    #[error("identifier cannot be blank")]
    Blank,
    /// The identifier contains the path separator `/`.
    #[error("identifier cannot contain separator '/'")]
    ContainsSeparator,
    /// The identifier length falls outside the permitted range.
    #[error("identifier has invalid length {len}, must be between {min}-{max} characters")]
    InvalidLength {
        /// Observed length in bytes.
        len: usize,
        /// Minimum permitted length.
        min: usize,
        /// Maximum permitted length.
        max: usize,
    },
    /// The identifier contains a character outside the permitted set.
    #[error("identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Validates a client identifier.
pub fn validate_client_identifier(identifier: &str) -> Result<(), IdentifierError> {
    validate_identifier(identifier, CLIENT_ID_LENGTH)
}

/// Validates a connection identifier.
pub fn validate_connection_identifier(identifier: &str) -> Result<(), IdentifierError> {
    validate_identifier(identifier, CONNECTION_ID_LENGTH)
}

fn validate_identifier(
    identifier: &str,
    length: RangeInclusive<usize>,
) -> Result<(), IdentifierError> {
    if identifier.trim().is_empty() {
        return Err(IdentifierError::Blank);
    }
    if identifier.contains('/') {
        return Err(IdentifierError::ContainsSeparator);
    }
    if !length.contains(&identifier.len()) {
        return Err(IdentifierError::InvalidLength {
            len: identifier.len(),
            min: *length.start(),
            max: *length.end(),
        });
    }
    match identifier.chars().find(|c| !is_identifier_char(*c)) {
        Some(invalid) => Err(IdentifierError::InvalidCharacter(invalid)),
        None => Ok(()),
    }
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-' | '#' | '[' | ']' | '<' | '>')
}
