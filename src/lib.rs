//! Facade crate for the SafeRoute engine.
//!
//! This crate re-exports the core domain types, the safety scorer and the
//! route planner, and exposes the HTTP and file provider adapters behind the
//! `http` feature.

#![forbid(unsafe_code)]

pub use saferoute_core::{
    CommerceSource, CoordinateError, FacilityPoint, ProviderError, ProviderKind, RouteProvider,
    RoutePath, RouteRequest, RouteSegment, RouteVariant, SafeRouteError, SafetyAssessment, SafetyGrade,
    ScoredRoute, SurveillanceSource, parse_lat_lng,
};
pub use saferoute_planner::{EngineConfig, RoutingClient, SafeRouteEngine, SafestRoute};
pub use saferoute_scorer::{SafetyScorer, StoreCacheConfig, StoreLookupCache};

#[cfg(feature = "http")]
pub use saferoute_data::{
    CommerceSearchConfig, FileSurveillanceSource, HttpCommerceSource, HttpProviderConfig,
    HttpRouteProvider, HttpSurveillanceSource, ProviderBuildError, SurveillanceSourceConfig,
};
