//! E2E Tools command line
//!
//! ```text
//! e2e-tools [--config options.json] [--log-level warn] <command>
//!
//!   render   [--source <yaml>]                    print generated description
//!   validate --description <file>                 validate a stored description
//!   check    --snapshot <json> [--json] <ticket>  audit a ticket
//!   plan     --snapshot <json> [--source <yaml>] [--json]
//! ```
//!
//! Reports go to stdout, logs to stderr. The exit code is 1 when a
//! validation or audit fails.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod commands;

pub use commands::Outcome;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use e2e_audit::ToolConfig;
use e2e_model::SourceLoader;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG: &str = "options.json";
/// Log filter used when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_LOG_LEVEL: &str = "warn";

fn source_arg() -> Arg {
    Arg::new("source")
        .long("source")
        .value_parser(value_parser!(PathBuf))
        .help("Source document (defaults to sourceFile from the config)")
}

fn snapshot_arg() -> Arg {
    Arg::new("snapshot")
        .long("snapshot")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Tracker snapshot (JSON)")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

/// Command line definition
#[must_use]
pub fn cli() -> Command {
    Command::new("e2e-tools")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate and check End-to-end Test ticket descriptions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .default_value(DEFAULT_CONFIG)
                .value_parser(value_parser!(PathBuf))
                .help("Tool configuration (JSON)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter, e.g. info or e2e_audit=debug (overrides RUST_LOG)"),
        )
        .subcommand(
            Command::new("render")
                .about("Print the description generated from a source document")
                .arg(source_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a stored description")
                .arg(
                    Arg::new("description")
                        .long("description")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File holding the description markup"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Audit an End-to-end Test ticket")
                .arg(snapshot_arg())
                .arg(json_arg())
                .arg(
                    Arg::new("ticket")
                        .required(true)
                        .help("Ticket URL or key"),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Show the changes that bring a ticket in line with a source document")
                .arg(snapshot_arg())
                .arg(source_arg())
                .arg(json_arg()),
        )
}

/// Log filter requested on the command line, if any
#[must_use]
pub fn log_level(matches: &ArgMatches) -> Option<&str> {
    matches.get_one::<String>("log-level").map(String::as_str)
}

fn config_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

fn load_config(path: &Path) -> Result<ToolConfig> {
    ToolConfig::from_file(path)
        .with_context(|| format!("failed to load config {}", path.display()))
}

fn source_path(args: &ArgMatches, config: Option<&ToolConfig>) -> Result<PathBuf> {
    args.get_one::<PathBuf>("source")
        .cloned()
        .or_else(|| config.and_then(|c| c.source_file.clone()))
        .context("no source document: pass --source or set sourceFile in the config")
}

/// Loader that also looks next to the executable
#[must_use]
pub fn source_loader() -> SourceLoader {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    match exe_dir {
        Some(dir) => SourceLoader::new().with_fallback_dir(dir),
        None => SourceLoader::new(),
    }
}

/// Run the selected subcommand
///
/// # Errors
/// Any rejection; the caller reports it and exits with failure.
pub async fn run(matches: &ArgMatches, out: &mut dyn Write) -> Result<Outcome> {
    let config_path = config_path(matches);
    let loader = source_loader();

    match matches.subcommand() {
        Some(("render", args)) => {
            let source = match args.get_one::<PathBuf>("source") {
                Some(source) => source.clone(),
                None => source_path(args, Some(&load_config(&config_path)?))?,
            };
            commands::render(&loader, &source, out)
        }
        Some(("validate", args)) => {
            let config = load_config(&config_path)?;
            let description = args
                .get_one::<PathBuf>("description")
                .context("missing --description")?;
            commands::validate(&config, description, out)
        }
        Some(("check", args)) => {
            let config = load_config(&config_path)?;
            let snapshot = args
                .get_one::<PathBuf>("snapshot")
                .context("missing --snapshot")?;
            let ticket = args.get_one::<String>("ticket").context("missing ticket")?;
            commands::check(&config, snapshot, ticket, args.get_flag("json"), out).await
        }
        Some(("plan", args)) => {
            let config = load_config(&config_path)?;
            let snapshot = args
                .get_one::<PathBuf>("snapshot")
                .context("missing --snapshot")?;
            let source = source_path(args, Some(&config))?;
            commands::plan(&config, &loader, snapshot, &source, args.get_flag("json"), out).await
        }
        _ => anyhow::bail!("unknown command"),
    }
}
