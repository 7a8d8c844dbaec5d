//! Behavioural tests for [`SafeRouteEngine::compute_safest_route`].

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use saferoute_core::test_support::{
    StubCommerceSource, StubRouteProvider, StubSurveillanceSource, straight_segment,
};
use saferoute_core::{
    FacilityPoint, ProviderError, RouteSegment, RouteVariant, SafeRouteError,
    SurveillanceDetails,
};
use saferoute_planner::{SafeRouteEngine, SafestRoute};

const ORIGIN: Coord<f64> = Coord {
    x: 126.9780,
    y: 37.5665,
};
const DESTINATION: Coord<f64> = Coord {
    x: 126.9780,
    y: 37.5705,
};
const WEST: Coord<f64> = Coord {
    x: 126.9750,
    y: 37.5685,
};
const EAST: Coord<f64> = Coord {
    x: 126.9810,
    y: 37.5685,
};

/// Stub collaborators and the outcome of the engine call.
#[derive(Default)]
struct World {
    routes: StubRouteProvider,
    surveillance: Option<StubSurveillanceSource>,
    outcome: Option<Result<SafestRoute, SafeRouteError>>,
}

#[fixture]
fn world() -> RefCell<World> {
    RefCell::new(World::default())
}

fn parse_variant(name: &str) -> RouteVariant {
    match name.trim() {
        "recommended" => RouteVariant::Recommended,
        "arterial" => RouteVariant::ArterialPriority,
        "shortest" => RouteVariant::Shortest,
        other => panic!("unknown variant {other}"),
    }
}

/// Each variant takes a distinct path between the same endpoints.
fn geometry(variant: RouteVariant) -> Vec<RouteSegment> {
    match variant {
        RouteVariant::Recommended => vec![straight_segment(ORIGIN, DESTINATION, 40)],
        RouteVariant::ArterialPriority => vec![
            straight_segment(ORIGIN, WEST, 20),
            straight_segment(WEST, DESTINATION, 20),
        ],
        RouteVariant::Shortest => vec![
            straight_segment(ORIGIN, EAST, 20),
            straight_segment(EAST, DESTINATION, 20),
        ],
    }
}

fn network_error() -> ProviderError {
    ProviderError::Network {
        url: "http://provider.invalid".into(),
        message: "connection refused".into(),
    }
}

#[given("route geometry for {variants}")]
fn given_geometry(variants: String, #[from(world)] world: &RefCell<World>) {
    let mut borrowed = world.borrow_mut();
    let mut routes = std::mem::take(&mut borrowed.routes);
    if variants != "none" {
        for variant in variants.split(',').map(parse_variant) {
            routes = routes.with_route(variant, geometry(variant));
        }
    }
    borrowed.routes = routes;
}

#[given("the {variant} variant fails with a network error")]
fn given_variant_failure(variant: String, #[from(world)] world: &RefCell<World>) {
    let mut borrowed = world.borrow_mut();
    let routes = std::mem::take(&mut borrowed.routes);
    borrowed.routes = routes.with_error(parse_variant(&variant), network_error());
}

#[given("a surveillance dataset along the {variant} route")]
fn given_cameras_along(variant: String, #[from(world)] world: &RefCell<World>) {
    let cameras = geometry(parse_variant(&variant))
        .into_iter()
        .flat_map(|segment| segment.coordinates)
        .map(|coord| {
            FacilityPoint::surveillance(coord, SurveillanceDetails::default())
                .expect("valid camera")
        })
        .collect();
    world.borrow_mut().surveillance = Some(StubSurveillanceSource::with_points(cameras));
}

#[given("an empty surveillance dataset")]
fn given_no_cameras(#[from(world)] world: &RefCell<World>) {
    world.borrow_mut().surveillance = Some(StubSurveillanceSource::default());
}

#[given("a surveillance dataset that fails with a network error")]
fn given_surveillance_failure(#[from(world)] world: &RefCell<World>) {
    world.borrow_mut().surveillance = Some(StubSurveillanceSource::with_error(network_error()));
}

#[when("the safest route is computed")]
fn when_computed(#[from(world)] world: &RefCell<World>) {
    let mut borrowed = world.borrow_mut();
    let routes = std::mem::take(&mut borrowed.routes);
    let surveillance = borrowed
        .surveillance
        .take()
        .expect("surveillance dataset must be configured");
    let engine = SafeRouteEngine::new(routes, surveillance, StubCommerceSource::default());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime builds");
    let outcome = runtime.block_on(engine.compute_safest_route(ORIGIN, DESTINATION));
    borrowed.outcome = Some(outcome);
}

#[then("the selected variant is {variant}")]
fn then_variant(variant: String, #[from(world)] world: &RefCell<World>) {
    let borrowed = world.borrow();
    let outcome = borrowed.outcome.as_ref().expect("engine must have run");
    let route = outcome.as_ref().expect("a route is selected");
    assert_eq!(route.route.variant(), parse_variant(&variant));
}

#[then("the selected grade is {grade}")]
fn then_grade(grade: String, #[from(world)] world: &RefCell<World>) {
    let borrowed = world.borrow();
    let outcome = borrowed.outcome.as_ref().expect("engine must have run");
    let route = outcome.as_ref().expect("a route is selected");
    assert_eq!(route.safety.grade().as_str(), grade);
}

#[then("the request fails with no valid route")]
fn then_no_route(#[from(world)] world: &RefCell<World>) {
    let borrowed = world.borrow();
    let outcome = borrowed.outcome.as_ref().expect("engine must have run");
    assert_eq!(outcome.as_ref().err(), Some(&SafeRouteError::NoValidRoute));
}

#[then("the request fails because the {provider} provider is unavailable")]
fn then_unavailable(provider: String, #[from(world)] world: &RefCell<World>) {
    let borrowed = world.borrow();
    let outcome = borrowed.outcome.as_ref().expect("engine must have run");
    let Some(SafeRouteError::ProviderUnavailable { provider: kind, .. }) = outcome.as_ref().err()
    else {
        panic!("expected a provider failure, got {outcome:?}");
    };
    assert_eq!(kind.as_str(), provider);
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/safest_route.feature", name = $title)]
        fn $fn_name(world: RefCell<World>) {
            let _ = world;
        }
    };
}

register_scenario!(invalid_variant_skipped, "one invalid variant is skipped");
register_scenario!(ties_recommended, "ties favour the recommended route");
register_scenario!(no_valid_variants, "no valid variants");
register_scenario!(routing_failure, "a routing failure aborts the request");
register_scenario!(
    surveillance_failure,
    "an unreachable surveillance dataset aborts the request"
);
