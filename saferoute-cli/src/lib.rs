//! Command-line interface for the SafeRoute engine.
//!
//! `saferoute shortest` prints the provider's shortest walking route and
//! `saferoute safest` prints the best scored candidate together with its
//! safety assessment. Both write pretty JSON to stdout. Options can come from
//! CLI flags, environment variables or configuration files.
#![forbid(unsafe_code)]

use std::io::Write;
use std::time::Duration;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use clap::{Parser, Subcommand};
use geo::Coord;
use saferoute_core::parse_lat_lng;
use saferoute_data::{DEFAULT_TIMEOUT_SECS, HttpProviderConfig};
use serde::Serialize;

mod error;
mod safest;
mod shortest;

pub use error::CliError;

use safest::{SafestArgs, run_safest};
use shortest::{ShortestArgs, run_shortest};

const ARG_ORIGIN: &str = "origin";
const ARG_DESTINATION: &str = "destination";
const ARG_ROUTING_KEY: &str = "routing-key";
const ARG_ROUTING_BASE_URL: &str = "routing-base-url";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_COMMERCE_KEY: &str = "commerce-key";
const ARG_COMMERCE_BASE_URL: &str = "commerce-base-url";
const ARG_SURVEILLANCE_KEY: &str = "surveillance-key";
const ARG_SURVEILLANCE_URL: &str = "surveillance-url";
const ARG_SURVEILLANCE_FILE: &str = "surveillance-file";
const ARG_SURVEILLANCE_PAGES: &str = "surveillance-pages";

/// Run the SafeRoute CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] describing the first failure; argument parsing
/// errors include `--help` and `--version` requests.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Shortest(args) => run_shortest(args, &mut stdout),
        Command::Safest(args) => run_safest(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "saferoute",
    about = "Plan walking routes scored by surveillance and commerce coverage",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the provider's shortest walking route.
    Shortest(ShortestArgs),
    /// Print the safest of the candidate walking routes.
    Safest(SafestArgs),
}

/// Parse a required `lat,lng` option.
fn require_coordinate(
    value: Option<&str>,
    field: &'static str,
    env: &'static str,
) -> Result<Coord<f64>, CliError> {
    let raw = value.ok_or(CliError::MissingArgument { field, env })?;
    parse_lat_lng(raw).map_err(|source| CliError::InvalidCoordinate { field, source })
}

/// Build HTTP settings from an optional base URL override and timeout.
fn http_config(
    base_url: Option<String>,
    default_base_url: &str,
    api_key: String,
    timeout_secs: Option<u64>,
) -> HttpProviderConfig {
    let timeout = Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
    HttpProviderConfig::new(
        base_url.unwrap_or_else(|| default_base_url.to_owned()),
        api_key,
    )
    .with_timeout(timeout)
}

/// Fail unless `path` names an existing regular file.
fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let Some(name) = path.file_name() else {
        return Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        });
    };
    let metadata = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.metadata(name));
    match metadata {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeRoute)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
