use clap::{Arg, ArgAction, Command, builder::OsStringValueParser};

/// Builds the `clap` command used for parsing.
pub(crate) fn clap_command(program_name: &'static str) -> Command {
    Command::new(program_name)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Negotiate and verify connection handshake versions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output on stderr (repeatable).")
                .global(true)
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Load compatible versions and feature-set policy from a JSON file.")
                .global(true)
                .action(ArgAction::Set)
                .value_parser(OsStringValueParser::new()),
        )
        .subcommand(
            Command::new("decode")
                .about("Print the identifier and features of an encoded version.")
                .arg(Arg::new("version").value_name("VERSION").required(true)),
        )
        .subcommand(
            Command::new("encode")
                .about("Print the canonical encoding of an identifier and features.")
                .arg(
                    Arg::new("identifier")
                        .value_name("IDENTIFIER")
                        .required(true),
                )
                .arg(
                    Arg::new("features")
                        .value_name("FEATURE")
                        .num_args(0..)
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("find")
                .about("Print the compatible version sharing the candidate's identifier.")
                .arg(Arg::new("candidate").value_name("CANDIDATE").required(true)),
        )
        .subcommand(
            Command::new("pick")
                .about("Negotiate against the counterparty's offered versions.")
                .arg(
                    Arg::new("offered")
                        .value_name("COUNTERPARTY_VERSION")
                        .required(true)
                        .num_args(1..)
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Check that a proposed version narrows the agreed version.")
                .arg(Arg::new("proposed").value_name("PROPOSED").required(true))
                .arg(Arg::new("agreed").value_name("AGREED").required(true)),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a JSON-encoded handshake message.")
                .arg(
                    Arg::new("message")
                        .value_name("MESSAGE.json")
                        .required(true)
                        .value_parser(OsStringValueParser::new()),
                ),
        )
}
