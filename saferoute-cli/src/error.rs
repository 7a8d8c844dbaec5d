//! Error types emitted by the SafeRoute CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use saferoute_core::{CoordinateError, ProviderKind, SafeRouteError};
use saferoute_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the SafeRoute CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A coordinate option could not be parsed.
    #[error("invalid --{field}: {source}")]
    InvalidCoordinate {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Parse or range failure.
        #[source]
        source: CoordinateError,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// An HTTP adapter could not be constructed.
    #[error("failed to build {provider} provider: {source}")]
    BuildProvider {
        /// Adapter that failed.
        provider: ProviderKind,
        /// Construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The engine could not produce a route.
    #[error("route computation failed: {0}")]
    Route(#[from] SafeRouteError),
    /// Serializing the route failed.
    #[error("failed to serialize route: {0}")]
    SerializeRoute(#[source] serde_json::Error),
    /// Writing the route failed.
    #[error("failed to write route output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
