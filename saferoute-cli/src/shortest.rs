//! `shortest` command implementation.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use saferoute_core::{ProviderKind, RouteProvider, RouteVariant};
use saferoute_data::{DEFAULT_ROUTING_BASE_URL, HttpProviderConfig, HttpRouteProvider};
use saferoute_planner::RoutingClient;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DESTINATION, ARG_ORIGIN, ARG_ROUTING_BASE_URL, ARG_ROUTING_KEY, ARG_TIMEOUT_SECS,
    CliError, build_runtime, http_config, require_coordinate, write_json,
};

pub(crate) const ENV_ORIGIN: &str = "SAFEROUTE_CMDS_SHORTEST_ORIGIN";
pub(crate) const ENV_DESTINATION: &str = "SAFEROUTE_CMDS_SHORTEST_DESTINATION";
pub(crate) const ENV_ROUTING_KEY: &str = "SAFEROUTE_CMDS_SHORTEST_ROUTING_KEY";

/// CLI arguments for the `shortest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Request the shortest walking route between two points from \
                 the pedestrian routing provider and print it as JSON. The \
                 route is not scored.",
    about = "Print the shortest walking route"
)]
#[ortho_config(prefix = "SAFEROUTE")]
pub(crate) struct ShortestArgs {
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
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ShortestArgs {
    pub(crate) fn into_config(self) -> Result<ShortestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ShortestConfig::try_from(merged)
    }
}

/// Resolved `shortest` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ShortestConfig {
    pub(crate) origin: Coord<f64>,
    pub(crate) destination: Coord<f64>,
    pub(crate) routing: HttpProviderConfig,
}

impl TryFrom<ShortestArgs> for ShortestConfig {
    type Error = CliError;

    fn try_from(args: ShortestArgs) -> Result<Self, Self::Error> {
        let origin = require_coordinate(args.origin.as_deref(), ARG_ORIGIN, ENV_ORIGIN)?;
        let destination =
            require_coordinate(args.destination.as_deref(), ARG_DESTINATION, ENV_DESTINATION)?;
        let routing_key = args.routing_key.ok_or(CliError::MissingArgument {
            field: ARG_ROUTING_KEY,
            env: ENV_ROUTING_KEY,
        })?;
        Ok(Self {
            origin,
            destination,
            routing: http_config(
                args.routing_base_url,
                DEFAULT_ROUTING_BASE_URL,
                routing_key,
                args.timeout_secs,
            ),
        })
    }
}

pub(crate) fn run_shortest(args: ShortestArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let provider = HttpRouteProvider::with_config(config.routing.clone()).map_err(|source| {
        CliError::BuildProvider {
            provider: ProviderKind::Routing,
            source,
        }
    })?;
    run_shortest_with(&config, provider, writer)
}

pub(crate) fn run_shortest_with<P: RouteProvider>(
    config: &ShortestConfig,
    provider: P,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let client = RoutingClient::new(provider).with_timeout(request_timeout(&config.routing));
    let runtime = build_runtime()?;
    let route = runtime.block_on(client.fetch_single(
        config.origin,
        config.destination,
        RouteVariant::Shortest,
    ))?;
    write_json(writer, &route)
}

/// Outer bound on one routing request, slightly above the HTTP timeout.
pub(crate) fn request_timeout(http: &HttpProviderConfig) -> Duration {
    http.timeout.saturating_add(Duration::from_secs(1))
}
