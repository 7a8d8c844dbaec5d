//! Focused unit tests covering CLI parsing and configuration resolution.

use super::helpers::{DESTINATION, DESTINATION_COORD, ORIGIN, ORIGIN_COORD, Workspace};
use super::*;
use camino::Utf8PathBuf;
use crate::safest::{SafestConfig, SurveillanceInput};
use crate::shortest::{ShortestConfig, request_timeout};
use rstest::rstest;
use saferoute_core::CoordinateError;
use saferoute_data::{
    DEFAULT_COMMERCE_BASE_URL, DEFAULT_ROUTING_BASE_URL, SurveillanceSourceConfig,
};

fn shortest_args() -> ShortestArgs {
    ShortestArgs {
        origin: Some(ORIGIN.to_owned()),
        destination: Some(DESTINATION.to_owned()),
        routing_key: Some("routing-key".to_owned()),
        ..ShortestArgs::default()
    }
}

fn safest_args() -> SafestArgs {
    SafestArgs {
        origin: Some(ORIGIN.to_owned()),
        destination: Some(DESTINATION.to_owned()),
        routing_key: Some("routing-key".to_owned()),
        commerce_key: Some("commerce-key".to_owned()),
        surveillance_key: Some("service-key".to_owned()),
        ..SafestArgs::default()
    }
}

#[rstest]
fn shortest_config_uses_provider_defaults() {
    let config = ShortestConfig::try_from(shortest_args()).expect("config should build");

    assert_eq!(config.origin, ORIGIN_COORD);
    assert_eq!(config.destination, DESTINATION_COORD);
    assert_eq!(config.routing.base_url, DEFAULT_ROUTING_BASE_URL);
    assert_eq!(config.routing.api_key, "routing-key");
    assert_eq!(
        config.routing.timeout,
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    );
    assert_eq!(
        request_timeout(&config.routing),
        Duration::from_secs(DEFAULT_TIMEOUT_SECS + 1)
    );
}

#[rstest]
fn shortest_config_applies_overrides() {
    let args = ShortestArgs {
        routing_base_url: Some("http://localhost:8080".to_owned()),
        timeout_secs: Some(5),
        ..shortest_args()
    };
    let config = ShortestConfig::try_from(args).expect("config should build");

    assert_eq!(config.routing.base_url, "http://localhost:8080");
    assert_eq!(config.routing.timeout, Duration::from_secs(5));
}

#[rstest]
#[case::origin(
    ShortestArgs { origin: None, ..shortest_args() },
    ARG_ORIGIN,
    shortest::ENV_ORIGIN,
)]
#[case::destination(
    ShortestArgs { destination: None, ..shortest_args() },
    ARG_DESTINATION,
    shortest::ENV_DESTINATION,
)]
#[case::routing_key(
    ShortestArgs { routing_key: None, ..shortest_args() },
    ARG_ROUTING_KEY,
    shortest::ENV_ROUTING_KEY,
)]
fn shortest_requires_every_mandatory_option(
    #[case] args: ShortestArgs,
    #[case] expected_field: &str,
    #[case] expected_env: &str,
) {
    let err = ShortestConfig::try_from(args).expect_err("missing option should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case::malformed("somewhere")]
#[case::out_of_range("91,0")]
#[case::not_a_number("north,0")]
fn shortest_rejects_unusable_origins(#[case] origin: &str) {
    let args = ShortestArgs {
        origin: Some(origin.to_owned()),
        ..shortest_args()
    };
    let err = ShortestConfig::try_from(args).expect_err("invalid origin should error");
    match err {
        CliError::InvalidCoordinate { field, .. } => assert_eq!(field, ARG_ORIGIN),
        other => panic!("expected InvalidCoordinate, found {other:?}"),
    }
}

#[rstest]
fn invalid_coordinates_keep_the_parse_failure() {
    let args = ShortestArgs {
        destination: Some("37.5".to_owned()),
        ..shortest_args()
    };
    let err = ShortestConfig::try_from(args).expect_err("invalid destination should error");
    match err {
        CliError::InvalidCoordinate { field, source } => {
            assert_eq!(field, ARG_DESTINATION);
            assert!(matches!(source, CoordinateError::Malformed { .. }));
        }
        other => panic!("expected InvalidCoordinate, found {other:?}"),
    }
}

#[rstest]
fn safest_config_fetches_surveillance_over_http_by_default() {
    let config = SafestConfig::try_from(safest_args()).expect("config should build");

    assert_eq!(config.commerce.http.base_url, DEFAULT_COMMERCE_BASE_URL);
    assert_eq!(config.commerce.http.api_key, "commerce-key");
    let expected = SurveillanceSourceConfig::new("service-key");
    assert_eq!(config.surveillance, SurveillanceInput::Http(expected));
    assert_eq!(config.engine_config().request_timeout, request_timeout(&config.routing));
}

#[rstest]
fn safest_config_applies_surveillance_overrides() {
    let args = SafestArgs {
        surveillance_url: Some("http://localhost:9000/cctv".to_owned()),
        surveillance_pages: Some(3),
        timeout_secs: Some(7),
        ..safest_args()
    };
    let config = SafestConfig::try_from(args).expect("config should build");

    let SurveillanceInput::Http(surveillance) = config.surveillance else {
        panic!("expected HTTP surveillance input");
    };
    assert_eq!(surveillance.http.base_url, "http://localhost:9000/cctv");
    assert_eq!(surveillance.http.api_key, "service-key");
    assert_eq!(surveillance.http.timeout, Duration::from_secs(7));
    assert_eq!(surveillance.max_pages, 3);
}

#[rstest]
fn safest_config_prefers_a_local_dataset() {
    let args = SafestArgs {
        surveillance_file: Some(Utf8PathBuf::from("cctv.json")),
        ..safest_args()
    };
    let config = SafestConfig::try_from(args).expect("config should build");
    assert_eq!(
        config.surveillance,
        SurveillanceInput::File(Utf8PathBuf::from("cctv.json"))
    );
}

#[rstest]
fn safest_local_dataset_needs_no_service_key() {
    let args = SafestArgs {
        surveillance_key: None,
        surveillance_file: Some(Utf8PathBuf::from("cctv.json")),
        ..safest_args()
    };
    SafestConfig::try_from(args).expect("config should build without a service key");
}

#[rstest]
#[case::commerce(
    SafestArgs { commerce_key: None, ..safest_args() },
    ARG_COMMERCE_KEY,
    safest::ENV_COMMERCE_KEY,
)]
#[case::surveillance(
    SafestArgs { surveillance_key: None, ..safest_args() },
    ARG_SURVEILLANCE_KEY,
    safest::ENV_SURVEILLANCE_KEY,
)]
#[case::routing(
    SafestArgs { routing_key: None, ..safest_args() },
    ARG_ROUTING_KEY,
    safest::ENV_ROUTING_KEY,
)]
fn safest_requires_provider_credentials(
    #[case] args: SafestArgs,
    #[case] expected_field: &str,
    #[case] expected_env: &str,
) {
    let err = SafestConfig::try_from(args).expect_err("missing key should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn validating_sources_accepts_existing_files() {
    let workspace = Workspace::new();
    let path = workspace.write("cctv.json", b"[]");
    let args = SafestArgs {
        surveillance_file: Some(path),
        ..safest_args()
    };
    let config = SafestConfig::try_from(args).expect("config should build");
    config.validate_sources().expect("existing file should validate");
}

#[rstest]
fn validating_sources_reports_missing_files() {
    let workspace = Workspace::new();
    let missing = workspace.root().join("missing.json");
    let args = SafestArgs {
        surveillance_file: Some(missing.clone()),
        ..safest_args()
    };
    let config = SafestConfig::try_from(args).expect("config should build");
    let err = config.validate_sources().expect_err("missing file should error");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_SURVEILLANCE_FILE);
            assert_eq!(path, missing);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validating_sources_rejects_directories() {
    let workspace = Workspace::new();
    let args = SafestArgs {
        surveillance_file: Some(workspace.root().to_path_buf()),
        ..safest_args()
    };
    let config = SafestConfig::try_from(args).expect("config should build");
    let err = config.validate_sources().expect_err("directory should error");
    match err {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_SURVEILLANCE_FILE),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn parsing_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "saferoute",
        "shortest",
        "--origin",
        "-33.8688,151.2093",
        "--destination",
        "-33.8570,151.2150",
    ])
    .expect("arguments should parse");
    let Command::Shortest(args) = cli.command else {
        panic!("expected shortest command");
    };
    assert_eq!(args.origin.as_deref(), Some("-33.8688,151.2093"));
    assert_eq!(args.destination.as_deref(), Some("-33.8570,151.2150"));
    assert!(args.routing_key.is_none());
}

#[rstest]
fn parsing_reads_safest_options() {
    let cli = Cli::try_parse_from([
        "saferoute",
        "safest",
        "--origin",
        ORIGIN,
        "--destination",
        DESTINATION,
        "--surveillance-file",
        "cctv.json",
        "--surveillance-pages",
        "2",
        "--timeout-secs",
        "10",
    ])
    .expect("arguments should parse");
    let Command::Safest(args) = cli.command else {
        panic!("expected safest command");
    };
    assert_eq!(args.surveillance_file, Some(Utf8PathBuf::from("cctv.json")));
    assert_eq!(args.surveillance_pages, Some(2));
    assert_eq!(args.timeout_secs, Some(10));
}

#[rstest]
fn parsing_requires_a_subcommand() {
    let err = Cli::try_parse_from(["saferoute"]).expect_err("subcommand is required");
    assert!(matches!(
        CliError::from(err),
        CliError::ArgumentParsing(_)
    ));
}
