//! `safest` command implementation.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use saferoute_core::{CommerceSource, ProviderKind, RouteProvider, SurveillanceSource};
use saferoute_data::{
    CommerceSearchConfig, DEFAULT_COMMERCE_BASE_URL, DEFAULT_ROUTING_BASE_URL,
    DEFAULT_SURVEILLANCE_URL, FileSurveillanceSource, HttpCommerceSource, HttpProviderConfig,
    HttpRouteProvider, HttpSurveillanceSource, SurveillanceSourceConfig,
};
use saferoute_planner::{EngineConfig, SafeRouteEngine};
use serde::{Deserialize, Serialize};

use crate::shortest::request_timeout;
use crate::{
    ARG_COMMERCE_BASE_URL, ARG_COMMERCE_KEY, ARG_DESTINATION, ARG_ORIGIN, ARG_ROUTING_BASE_URL,
    ARG_ROUTING_KEY, ARG_SURVEILLANCE_FILE, ARG_SURVEILLANCE_KEY, ARG_SURVEILLANCE_PAGES,
    ARG_SURVEILLANCE_URL, ARG_TIMEOUT_SECS, CliError, build_runtime, http_config,
    require_coordinate, require_existing, write_json,
};

pub(crate) const ENV_ORIGIN: &str = "SAFEROUTE_CMDS_SAFEST_ORIGIN";
pub(crate) const ENV_DESTINATION: &str = "SAFEROUTE_CMDS_SAFEST_DESTINATION";
pub(crate) const ENV_ROUTING_KEY: &str = "SAFEROUTE_CMDS_SAFEST_ROUTING_KEY";
pub(crate) const ENV_COMMERCE_KEY: &str = "SAFEROUTE_CMDS_SAFEST_COMMERCE_KEY";
pub(crate) const ENV_SURVEILLANCE_KEY: &str = "SAFEROUTE_CMDS_SAFEST_SURVEILLANCE_KEY";

/// CLI arguments for the `safest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Request every walking route variant between two points, \
                 score each against the surveillance dataset and nearby \
                 convenience stores, and print the safest as JSON. The \
                 surveillance dataset is read from --surveillance-file when \
                 given, otherwise fetched from the public dataset API.",
    about = "Print the safest walking route"
)]
#[ortho_config(prefix = "SAFEROUTE")]
pub(crate) struct SafestArgs {
    /// Start point as "lat,lng".
    #[arg(long = ARG_ORIGIN, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) origin: Option<String>,
    /// End point as "lat,lng".
    #[arg(long = ARG_DESTINATION, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) destination: Option<String>,
    /// API key for the pedestrian routing provider.
    #[arg(long = ARG_ROUTING_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) routing_key: Option<String>,
    /// Override the routing provider base URL.
    #[arg(long = ARG_ROUTING_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) routing_base_url: Option<String>,
    /// REST key for the commerce search.
    #[arg(long = ARG_COMMERCE_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) commerce_key: Option<String>,
    /// Override the commerce search base URL.
    #[arg(long = ARG_COMMERCE_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) commerce_base_url: Option<String>,
    /// Service key for the surveillance dataset API.
    #[arg(long = ARG_SURVEILLANCE_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) surveillance_key: Option<String>,
    /// Override the surveillance dataset endpoint.
    #[arg(long = ARG_SURVEILLANCE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) surveillance_url: Option<String>,
    /// Read the surveillance dataset from a JSON export instead of the API.
    #[arg(long = ARG_SURVEILLANCE_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) surveillance_file: Option<Utf8PathBuf>,
    /// Maximum number of dataset pages to fetch.
    #[arg(long = ARG_SURVEILLANCE_PAGES, value_name = "count")]
    #[serde(default)]
    pub(crate) surveillance_pages: Option<u32>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl SafestArgs {
    pub(crate) fn into_config(self) -> Result<SafestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SafestConfig::try_from(merged)
    }
}

/// Where the surveillance dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SurveillanceInput {
    /// Local JSON export.
    File(Utf8PathBuf),
    /// Public dataset API.
    Http(SurveillanceSourceConfig),
}

/// Resolved `safest` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SafestConfig {
    pub(crate) origin: Coord<f64>,
    pub(crate) destination: Coord<f64>,
    pub(crate) routing: HttpProviderConfig,
    pub(crate) commerce: CommerceSearchConfig,
    pub(crate) surveillance: SurveillanceInput,
}

impl SafestConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match &self.surveillance {
            SurveillanceInput::File(path) => require_existing(path, ARG_SURVEILLANCE_FILE),
            SurveillanceInput::Http(_) => Ok(()),
        }
    }

    pub(crate) fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            request_timeout: request_timeout(&self.routing),
            ..EngineConfig::default()
        }
    }
}

impl TryFrom<SafestArgs> for SafestConfig {
    type Error = CliError;

    fn try_from(args: SafestArgs) -> Result<Self, Self::Error> {
        let origin = require_coordinate(args.origin.as_deref(), ARG_ORIGIN, ENV_ORIGIN)?;
        let destination =
            require_coordinate(args.destination.as_deref(), ARG_DESTINATION, ENV_DESTINATION)?;
        let routing_key = args.routing_key.ok_or(CliError::MissingArgument {
            field: ARG_ROUTING_KEY,
            env: ENV_ROUTING_KEY,
        })?;
        let commerce_key = args.commerce_key.ok_or(CliError::MissingArgument {
            field: ARG_COMMERCE_KEY,
            env: ENV_COMMERCE_KEY,
        })?;
        let surveillance = match args.surveillance_file {
            Some(path) => SurveillanceInput::File(path),
            None => {
                let key = args.surveillance_key.ok_or(CliError::MissingArgument {
                    field: ARG_SURVEILLANCE_KEY,
                    env: ENV_SURVEILLANCE_KEY,
                })?;
                let http = http_config(
                    args.surveillance_url,
                    DEFAULT_SURVEILLANCE_URL,
                    key,
                    args.timeout_secs,
                );
                SurveillanceInput::Http(
                    SurveillanceSourceConfig::with_http(http)
                        .with_max_pages(args.surveillance_pages.unwrap_or(1)),
                )
            }
        };
        Ok(Self {
            origin,
            destination,
            routing: http_config(
                args.routing_base_url,
                DEFAULT_ROUTING_BASE_URL,
                routing_key,
                args.timeout_secs,
            ),
            commerce: CommerceSearchConfig::with_http(http_config(
                args.commerce_base_url,
                DEFAULT_COMMERCE_BASE_URL,
                commerce_key,
                args.timeout_secs,
            )),
            surveillance,
        })
    }
}

fn build_surveillance(
    input: &SurveillanceInput,
) -> Result<Arc<dyn SurveillanceSource>, CliError> {
    match input {
        SurveillanceInput::File(path) => Ok(Arc::new(FileSurveillanceSource::new(path.clone()))),
        SurveillanceInput::Http(config) => {
            let source = HttpSurveillanceSource::with_config(config.clone()).map_err(|source| {
                CliError::BuildProvider {
                    provider: ProviderKind::Surveillance,
                    source,
                }
            })?;
            Ok(Arc::new(source))
        }
    }
}

pub(crate) fn run_safest(args: SafestArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let provider = HttpRouteProvider::with_config(config.routing.clone()).map_err(|source| {
        CliError::BuildProvider {
            provider: ProviderKind::Routing,
            source,
        }
    })?;
    let commerce = HttpCommerceSource::with_config(config.commerce.clone()).map_err(|source| {
        CliError::BuildProvider {
            provider: ProviderKind::Commerce,
            source,
        }
    })?;
    let surveillance = build_surveillance(&config.surveillance)?;
    let engine =
        SafeRouteEngine::with_config(provider, surveillance, commerce, config.engine_config());
    run_safest_with(&config, &engine, writer)
}

pub(crate) fn run_safest_with<P, S, C>(
    config: &SafestConfig,
    engine: &SafeRouteEngine<P, S, C>,
    writer: &mut dyn Write,
) -> Result<(), CliError>
where
    P: RouteProvider,
    S: SurveillanceSource,
    C: CommerceSource,
{
    let runtime = build_runtime()?;
    let route = runtime.block_on(engine.compute_safest_route(config.origin, config.destination))?;
    log::info!(
        "safest route is {} with grade {}",
        route.route.variant(),
        route.safety.grade()
    );
    write_json(writer, &route)
}
