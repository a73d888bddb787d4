//! Verbosity configuration mapped onto the negotiation tracing targets.

use std::fmt;

/// Target used by the version string codec.
pub const CODEC_TARGET: &str = "connver::codec";
/// Target used while picking a version from two advertised lists.
pub const NEGOTIATE_TARGET: &str = "connver::negotiate";
/// Target used while confirming a proposed feature set.
pub const VERIFY_TARGET: &str = "connver::verify";
/// Target used while validating handshake messages.
pub const HANDSHAKE_TARGET: &str = "connver::handshake";

/// Minimum severity recorded for a target.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Level {
    /// Nothing is recorded.
    Off,
    /// Only errors.
    Error,
    /// Warnings and errors.
    #[default]
    Warn,
    /// Informational events and above.
    Info,
    /// Debug events and above.
    Debug,
    /// Everything.
    Trace,
}

impl Level {
    /// Returns the filter directive spelling of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-target levels derived from the `-v` count.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Level for [`CODEC_TARGET`].
    pub codec: Level,
    /// Level for [`NEGOTIATE_TARGET`].
    pub negotiate: Level,
    /// Level for [`VERIFY_TARGET`].
    pub verify: Level,
    /// Level for [`HANDSHAKE_TARGET`].
    pub handshake: Level,
}

impl VerbosityConfig {
    /// Create a configuration from a verbose level.
    ///
    /// Level 0 records warnings only. Level 1 enables debug output for
    /// negotiation, verification and message validation. Level 2 adds the
    /// codec, and level 3 or higher records everything.
    #[must_use]
    pub const fn from_verbose_level(level: u8) -> Self {
        match level {
            0 => Self::uniform(Level::Warn),
            1 => Self {
                codec: Level::Warn,
                negotiate: Level::Debug,
                verify: Level::Debug,
                handshake: Level::Debug,
            },
            2 => Self::uniform(Level::Debug),
            _ => Self::uniform(Level::Trace),
        }
    }

    /// Create a configuration that applies `level` to every target.
    #[must_use]
    pub const fn uniform(level: Level) -> Self {
        Self {
            codec: level,
            negotiate: level,
            verify: level,
            handshake: level,
        }
    }

    /// Returns each target paired with its configured level.
    #[must_use]
    pub const fn targets(&self) -> [(&'static str, Level); 4] {
        [
            (CODEC_TARGET, self.codec),
            (NEGOTIATE_TARGET, self.negotiate),
            (VERIFY_TARGET, self.verify),
            (HANDSHAKE_TARGET, self.handshake),
        ]
    }

    /// Renders the configuration as a comma-separated filter directive list.
    ///
    /// Targets outside the negotiation crates are limited to warnings.
    #[must_use]
    pub fn directives(&self) -> String {
        let mut out = String::from("warn");
        for (target, level) in self.targets() {
            out.push(',');
            out.push_str(target);
            out.push('=');
            out.push_str(level.as_str());
        }
        out
    }
}
