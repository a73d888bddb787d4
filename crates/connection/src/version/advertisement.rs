//! Conversions between the representations a version list may arrive in.

use std::borrow::Cow;

use super::codec::{Version, VersionError, decode_version};

/// Types that can be interpreted as an advertised connection version.
///
/// Handshake messages carry versions as raw strings while configuration and
/// higher layers usually hold decoded [`Version`] values. The negotiation
/// helpers accept either through this trait so a list of wire strings never
/// has to be decoded up front, and a malformed entry only disqualifies itself.
pub trait VersionAdvertisement {
    /// Returns the decoded version, borrowing when no decoding is required.
    fn to_version(&self) -> Result<Cow<'_, Version>, VersionError>;

    /// Returns the advertisement as it would appear on the wire.
    fn advertised(&self) -> Cow<'_, str>;
}

impl VersionAdvertisement for Version {
    #[inline]
    fn to_version(&self) -> Result<Cow<'_, Version>, VersionError> {
        Ok(Cow::Borrowed(self))
    }

    fn advertised(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

impl VersionAdvertisement for str {
    #[inline]
    fn to_version(&self) -> Result<Cow<'_, Version>, VersionError> {
        decode_version(self).map(Cow::Owned)
    }

    #[inline]
    fn advertised(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl VersionAdvertisement for String {
    #[inline]
    fn to_version(&self) -> Result<Cow<'_, Version>, VersionError> {
        self.as_str().to_version()
    }

    #[inline]
    fn advertised(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T> VersionAdvertisement for &T
where
    T: VersionAdvertisement + ?Sized,
{
    #[inline]
    fn to_version(&self) -> Result<Cow<'_, Version>, VersionError> {
        (**self).to_version()
    }

    #[inline]
    fn advertised(&self) -> Cow<'_, str> {
        (**self).advertised()
    }
}
