//! Subscriber installation for binaries.
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2));
//! tracing::debug!(target: "connver::negotiate", "visible at -vv");
//! ```

use tracing_subscriber::EnvFilter;

use super::config::VerbosityConfig;

/// Builds the event filter for `config`.
///
/// A valid `RUST_LOG` value overrides the verbosity mapping; an unset or
/// unparsable value falls back to [`VerbosityConfig::directives`].
#[must_use]
pub fn env_filter(config: &VerbosityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()))
}

/// Installs a formatting subscriber that writes to stderr.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one is left in place.
pub fn init_tracing(config: VerbosityConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_is_reported() {
        let config = VerbosityConfig::from_verbose_level(1);
        let _ = init_tracing(config);
        assert!(!init_tracing(config));
    }

    #[test]
    fn filter_renders_configured_targets() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let rendered = env_filter(&VerbosityConfig::from_verbose_level(2)).to_string();
        assert!(rendered.contains("connver::codec=debug"), "{rendered}");
    }
}
