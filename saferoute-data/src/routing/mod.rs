//! Pedestrian routing over HTTP.
//!
//! [`HttpRouteProvider`] implements [`saferoute_core::RouteProvider`] against
//! the Tmap pedestrian route API. Each request returns a `GeoJSON` feature
//! collection which is flattened into [`saferoute_core::RouteSegment`]s; the
//! engine merges those into a single route.

mod provider;
mod tmap;

pub use provider::{DEFAULT_ROUTING_BASE_URL, HttpRouteProvider};
pub use tmap::search_option;
