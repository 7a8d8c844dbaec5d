//! Core domain types for the SafeRoute engine.
//!
//! The crate holds everything that can be decided without talking to the
//! outside world: coordinate validation, great-circle maths, polyline
//! decimation, facility proximity matching, safety grading and route
//! selection. Provider traits describe the collaborators the engine consumes
//! (pedestrian routing, surveillance datasets and commerce search) without
//! committing to a transport.
//!
//! Coordinates are WGS84 [`geo::Coord`] values with `x = longitude` and
//! `y = latitude` throughout.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod decimate;
pub mod error;
pub mod facility;
pub mod geo_math;
pub mod location;
pub mod provider;
pub mod proximity;
pub mod route;
pub mod safety;
pub mod selector;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;

pub use decimate::{DEFAULT_MAX_POINTS, decimate};
pub use error::{ProviderError, ProviderKind, SafeRouteError};
pub use facility::{
    CommerceDetails, FacilityDetails, FacilityKind, FacilityPoint, SurveillanceDetails,
};
pub use geo_math::{haversine_distance, within_rough_bounds};
pub use location::{CoordinateError, parse_lat_lng, validate_coordinate};
pub use provider::{CommerceSource, RouteProvider, RouteRequest, SurveillanceSource};
pub use proximity::{CoverageTally, FacilityMatcher, tally_coverage};
pub use route::{RouteError, RoutePath, RouteSegment, RouteVariant};
pub use safety::{SafetyAssessment, SafetyGrade, ScoredRoute, total_safety_points};
pub use selector::{route_score, select_best_route};
