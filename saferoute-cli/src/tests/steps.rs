//! Behaviour-driven step definitions driving the route command scenarios.

use super::helpers::{DESTINATION, ORIGIN, cameras_along, direct_route};
use super::*;
use crate::safest::{SafestConfig, run_safest_with};
use crate::shortest::{ShortestConfig, run_shortest_with};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use saferoute_core::test_support::{
    StubCommerceSource, StubRouteProvider, StubSurveillanceSource,
};
use saferoute_core::{FacilityPoint, RouteVariant, SafeRouteError};
use saferoute_planner::SafeRouteEngine;
use serde_json::Value;
use std::cell::RefCell;

#[derive(Debug, Default)]
struct RouteWorld {
    routes: StubRouteProvider,
    cameras: Vec<FacilityPoint>,
    origin: Option<String>,
    omit_routing_key: bool,
    stdout: Vec<u8>,
    result: Option<Result<(), CliError>>,
}

impl RouteWorld {
    fn command_line(&self, command: &str) -> Vec<String> {
        let mut argv = vec!["saferoute".to_owned(), command.to_owned()];
        argv.extend([
            format!("--{ARG_ORIGIN}"),
            self.origin.clone().unwrap_or_else(|| ORIGIN.to_owned()),
            format!("--{ARG_DESTINATION}"),
            DESTINATION.to_owned(),
        ]);
        if !self.omit_routing_key {
            argv.extend([format!("--{ARG_ROUTING_KEY}"), "routing-key".to_owned()]);
        }
        if command == "safest" {
            argv.extend([
                format!("--{ARG_COMMERCE_KEY}"),
                "commerce-key".to_owned(),
                format!("--{ARG_SURVEILLANCE_KEY}"),
                "service-key".to_owned(),
            ]);
        }
        argv
    }

    fn error(&self) -> &CliError {
        self.result
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error")
    }

    fn output(&self) -> Value {
        self.result
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect("expected success");
        serde_json::from_slice(&self.stdout).expect("output should be JSON")
    }
}

#[fixture]
fn world() -> RefCell<RouteWorld> {
    RefCell::new(RouteWorld::default())
}

#[given("the router returns a direct route")]
fn router_returns_direct_route(#[from(world)] world: &RefCell<RouteWorld>) {
    world.borrow_mut().routes = StubRouteProvider::default().with_all_routes(&direct_route());
}

#[given("the router returns no routes")]
fn router_returns_no_routes(#[from(world)] world: &RefCell<RouteWorld>) {
    world.borrow_mut().routes = StubRouteProvider::default();
}

#[given("cameras line the direct route")]
fn cameras_line_route(#[from(world)] world: &RefCell<RouteWorld>) {
    world.borrow_mut().cameras = cameras_along(&direct_route());
}

#[given("I omit the routing key")]
fn omit_routing_key(#[from(world)] world: &RefCell<RouteWorld>) {
    world.borrow_mut().omit_routing_key = true;
}

#[given("the origin is {origin}")]
fn origin_is(origin: String, #[from(world)] world: &RefCell<RouteWorld>) {
    world.borrow_mut().origin = Some(origin.trim_matches('"').to_owned());
}

#[when("I run the {command} command")]
fn run_command(command: String, #[from(world)] world: &RefCell<RouteWorld>) {
    let mut borrowed = world.borrow_mut();
    let state = &mut *borrowed;
    let invocation = state.command_line(&command);
    let routes = std::mem::take(&mut state.routes);
    let cameras = std::mem::take(&mut state.cameras);
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Shortest(args) => {
            let config = ShortestConfig::try_from(args)?;
            run_shortest_with(&config, routes, &mut state.stdout)
        }
        Command::Safest(args) => {
            let config = SafestConfig::try_from(args)?;
            let engine = SafeRouteEngine::with_config(
                routes,
                StubSurveillanceSource::with_points(cameras),
                StubCommerceSource::default(),
                config.engine_config(),
            );
            run_safest_with(&config, &engine, &mut state.stdout)
        }
    });
    state.result = Some(outcome);
}

#[then("the command prints a shortest route")]
fn prints_shortest_route(#[from(world)] world: &RefCell<RouteWorld>) {
    let output = world.borrow().output();
    assert_eq!(output["variant"], RouteVariant::Shortest.as_str());
    let points = output["points"].as_array().expect("points array");
    let expected = direct_route()
        .first()
        .map_or(0, |segment| segment.coordinates.len());
    assert_eq!(points.len(), expected);
}

#[then("the command prints a route graded {grade}")]
fn prints_graded_route(grade: String, #[from(world)] world: &RefCell<RouteWorld>) {
    let output = world.borrow().output();
    assert_eq!(output["safety"]["grade"], grade.as_str());
    assert_eq!(output["route"]["variant"], RouteVariant::Recommended.as_str());
    assert!(
        output["nearby_surveillance"]
            .as_array()
            .is_some_and(|cameras| !cameras.is_empty())
    );
}

#[then("the command fails because no route is valid")]
fn fails_without_route(#[from(world)] world: &RefCell<RouteWorld>) {
    let borrowed = world.borrow();
    match borrowed.error() {
        CliError::Route(SafeRouteError::NoValidRoute) => {}
        other => panic!("expected NoValidRoute, found {other:?}"),
    }
}

#[then("the command fails because the {field} option is missing")]
fn fails_missing_option(field: String, #[from(world)] world: &RefCell<RouteWorld>) {
    let borrowed = world.borrow();
    match borrowed.error() {
        CliError::MissingArgument { field: missing, .. } => assert_eq!(*missing, field),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the origin is invalid")]
fn fails_invalid_origin(#[from(world)] world: &RefCell<RouteWorld>) {
    let borrowed = world.borrow();
    match borrowed.error() {
        CliError::InvalidCoordinate { field, .. } => assert_eq!(*field, ARG_ORIGIN),
        other => panic!("expected InvalidCoordinate, found {other:?}"),
    }
}

macro_rules! register_route_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/route_commands.feature", name = $scenario_title)]
        fn $fn_name(world: RefCell<RouteWorld>) {
            let _ = world;
        }
    };
}

register_route_scenario!(shortest_happy_path, "printing the shortest route");
register_route_scenario!(safest_happy_path, "printing the safest route");
register_route_scenario!(safest_without_route, "reporting when no route exists");
register_route_scenario!(shortest_missing_key, "rejecting a missing routing key");
register_route_scenario!(safest_invalid_origin, "rejecting an unparseable origin");
