#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `connver` command-line front end. It exposes the
//! version codec, the negotiator, and the feature-set verifier from the
//! [`connection`] crate as subcommands so handshake traces can be replayed and
//! checked by hand.
//!
//! # Design
//!
//! [`run`] accepts an argument iterator together with handles for standard
//! output and error, mirroring the signature used by the binary's `main`.
//! Arguments are parsed with `clap`'s builder API; a `--config` file replaces
//! the default compatible-version list and feature-set policy for the
//! invocation. Diagnostics are written to the supplied error stream and the
//! function returns the exit status instead of terminating the process.
//!
//! # Exit status
//!
//! - [`EXIT_SUCCESS`] when the command succeeded.
//! - [`EXIT_ERROR`] for usage errors, malformed input, or unreadable
//!   configuration.
//! - [`EXIT_REFUSED`] when negotiation fails, no compatible version is found,
//!   or a proposed version is refused.
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = run(
//!     ["connver", "pick", "(1,[UNORDERED,DAG])"],
//!     &mut stdout,
//!     &mut stderr,
//! );
//!
//! assert_eq!(status, 0);
//! assert_eq!(stdout, b"(1,[UNORDERED])\n");
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::path::Path;

use clap::ArgMatches;
use connection::msgs::HandshakeMsg;
use connection::{
    NegotiationConfig, VerificationError, Version, check_proposed_feature_set, decode_version,
};
use logging::VerbosityConfig;

mod command_builder;

use command_builder::clap_command;

/// Program name used in usage output and diagnostics.
const PROGRAM_NAME: &str = "connver";

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Exit status of a successful command.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status for usage errors, malformed input, and configuration errors.
pub const EXIT_ERROR: i32 = 1;

/// Exit status when negotiation or verification refuses the input.
pub const EXIT_REFUSED: i32 = 2;

/// A command outcome that ends the invocation with a non-zero status.
#[derive(Debug)]
struct Failure {
    exit_code: i32,
    message: String,
}

impl Failure {
    fn error(message: impl fmt::Display) -> Self {
        Self {
            exit_code: EXIT_ERROR,
            message: message.to_string(),
        }
    }

    fn refused(message: impl fmt::Display) -> Self {
        Self {
            exit_code: EXIT_REFUSED,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// The function returns the process exit code that should be used by the
/// caller. The first argument is treated as the program name.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let matches = match clap_command(PROGRAM_NAME).try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(error) => return render_clap_error(&error, stdout, stderr),
    };

    let verbosity = VerbosityConfig::from_verbose_level(matches.get_count("verbose"));
    if !logging::init_tracing(verbosity) {
        tracing::debug!("tracing subscriber already installed; keeping it");
    }

    match execute(&matches, stdout) {
        Ok(()) => EXIT_SUCCESS,
        Err(failure) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {failure}");
            failure.exit_code
        }
    }
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = u8::try_from(status.clamp(0, MAX_EXIT_CODE)).unwrap_or(u8::MAX);
    std::process::ExitCode::from(clamped)
}

/// Writes help and version output to stdout and parse errors to stderr.
fn render_clap_error<Out, Err>(error: &clap::Error, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    let rendered = error.render().to_string();
    if error.use_stderr() {
        let _ = stderr.write_all(rendered.as_bytes());
        EXIT_ERROR
    } else if stdout.write_all(rendered.as_bytes()).is_err() {
        EXIT_ERROR
    } else {
        EXIT_SUCCESS
    }
}

fn execute<Out: Write>(matches: &ArgMatches, stdout: &mut Out) -> Result<(), Failure> {
    let config = load_config(matches.get_one::<OsString>("config"))?;

    let Some((name, sub)) = matches.subcommand() else {
        return Err(Failure::error("no command given"));
    };
    tracing::debug!(command = name, "dispatching command");

    match name {
        "decode" => decode(required(sub, "version")?, stdout),
        "encode" => encode(
            required(sub, "identifier")?,
            sub.get_many::<String>("features")
                .map(Iterator::collect)
                .unwrap_or_default(),
            stdout,
        ),
        "find" => find(&config, required(sub, "candidate")?, stdout),
        "pick" => pick(
            &config,
            &sub.get_many::<String>("offered")
                .map(Iterator::collect::<Vec<_>>)
                .unwrap_or_default(),
            stdout,
        ),
        "verify" => verify(
            &config,
            required(sub, "proposed")?,
            required(sub, "agreed")?,
            stdout,
        ),
        "validate" => match sub.get_one::<OsString>("message") {
            Some(path) => validate(Path::new(path), stdout),
            None => Err(Failure::error("missing MESSAGE.json")),
        },
        other => Err(Failure::error(format!("unknown command '{other}'"))),
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str, Failure> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| Failure::error(format!("missing required argument '{id}'")))
}

fn load_config(path: Option<&OsString>) -> Result<NegotiationConfig, Failure> {
    match path {
        Some(path) => NegotiationConfig::from_json_file(path).map_err(|err| {
            Failure::error(format!("{}: {err}", Path::new(path).display()))
        }),
        None => Ok(NegotiationConfig::default()),
    }
}

fn emit<Out: Write>(stdout: &mut Out, line: impl fmt::Display) -> Result<(), Failure> {
    writeln!(stdout, "{line}")
        .map_err(|err| Failure::error(format!("failed to write output: {err}")))
}

fn decode<Out: Write>(raw: &str, stdout: &mut Out) -> Result<(), Failure> {
    let version = decode_version(raw).map_err(Failure::error)?;
    emit(stdout, format_args!("identifier: {}", version.identifier()))?;
    if version.features().is_empty() {
        emit(stdout, "features: (none)")
    } else {
        emit(
            stdout,
            format_args!("features: {}", version.features().join(",")),
        )
    }
}

fn encode<Out: Write>(
    identifier: &str,
    features: Vec<&String>,
    stdout: &mut Out,
) -> Result<(), Failure> {
    let version = Version::new(identifier, features).map_err(Failure::error)?;
    emit(stdout, version)
}

fn find<Out: Write>(
    config: &NegotiationConfig,
    raw: &str,
    stdout: &mut Out,
) -> Result<(), Failure> {
    let candidate = decode_version(raw).map_err(Failure::error)?;
    match config.find_supported(&candidate) {
        Some(supported) => emit(stdout, supported),
        None => Err(Failure::refused(format!(
            "no compatible version with identifier {:?}",
            candidate.identifier()
        ))),
    }
}

fn pick<Out: Write>(
    config: &NegotiationConfig,
    offered: &[&String],
    stdout: &mut Out,
) -> Result<(), Failure> {
    let picked = config.pick(offered).map_err(Failure::refused)?;
    emit(stdout, picked)
}

fn verify<Out: Write>(
    config: &NegotiationConfig,
    proposed: &str,
    agreed: &str,
    stdout: &mut Out,
) -> Result<(), Failure> {
    match check_proposed_feature_set(proposed, agreed, config.policy()) {
        Ok(()) => emit(stdout, "accepted"),
        Err(VerificationError::Malformed(err)) => Err(Failure::error(err)),
        Err(err) => Err(Failure::refused(err)),
    }
}

fn validate<Out: Write>(path: &Path, stdout: &mut Out) -> Result<(), Failure> {
    let document = std::fs::read_to_string(path)
        .map_err(|err| Failure::error(format!("{}: {err}", path.display())))?;
    let msg: HandshakeMsg = serde_json::from_str(&document)
        .map_err(|err| Failure::error(format!("{}: {err}", path.display())))?;
    msg.validate_basic()
        .map_err(|err| Failure::error(format!("{}: {err}", msg.msg_type())))?;
    emit(stdout, format_args!("{}: valid", msg.msg_type()))
}
