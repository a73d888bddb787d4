#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` names the tracing targets used by the connection negotiation
//! crates and maps a command-line verbosity count onto per-target levels.
//!
//! # Design
//!
//! Library code emits events through the `trace_*!` macros, which expand to
//! [`tracing`](https://docs.rs/tracing) calls against a fixed target such as
//! `connver::negotiate`. The calling crate must depend on `tracing` itself.
//! Binaries translate `-v` flags into a [`VerbosityConfig`] and, with the
//! `tracing` feature enabled, install a stderr subscriber through
//! `init_tracing`. A `RUST_LOG` value in the environment takes precedence over
//! the verbosity mapping.
//!
//! # Examples
//!
//! ```
//! use logging::{Level, VerbosityConfig};
//!
//! let config = VerbosityConfig::from_verbose_level(1);
//! assert_eq!(config.negotiate, Level::Debug);
//! assert_eq!(config.codec, Level::Warn);
//! assert!(config.directives().contains("connver::negotiate=debug"));
//! ```

mod config;
mod tracing_macros;

#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::{
    CODEC_TARGET, HANDSHAKE_TARGET, Level, NEGOTIATE_TARGET, VERIFY_TARGET, VerbosityConfig,
};

#[cfg(feature = "tracing")]
pub use tracing_bridge::{env_filter, init_tracing};
