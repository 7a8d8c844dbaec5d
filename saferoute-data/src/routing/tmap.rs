//! Request and response types for the pedestrian route API.
//!
//! Responses are `GeoJSON` feature collections. `LineString` features carry
//! the walked geometry as `[lon, lat]` pairs; `Point` features mark turns and
//! carry no geometry of interest. Every feature may report the distance and
//! time of the stretch it describes.

use geo::Coord;
use saferoute_core::{ProviderError, RouteSegment, RouteVariant};
use serde::{Deserialize, Serialize};

/// Coordinate system identifier for WGS84 degrees.
pub const WGS84: &str = "WGS84GEO";

/// Numeric `searchOption` for a route variant.
#[must_use]
pub const fn search_option(variant: RouteVariant) -> u8 {
    match variant {
        RouteVariant::Recommended => 0,
        RouteVariant::ArterialPriority => 4,
        RouteVariant::Shortest => 10,
    }
}

/// Body of a pedestrian route request.
///
/// Coordinates are sent as decimal strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PedestrianRouteRequest<'a> {
    /// Origin longitude.
    pub start_x: String,
    /// Origin latitude.
    pub start_y: String,
    /// Destination longitude.
    pub end_x: String,
    /// Destination latitude.
    pub end_y: String,
    /// Coordinate system of the request.
    pub req_coord_type: &'a str,
    /// Coordinate system of the response.
    pub res_coord_type: &'a str,
    /// Display name for the origin.
    pub start_name: &'a str,
    /// Display name for the destination.
    pub end_name: &'a str,
    /// Path-finding strategy.
    pub search_option: u8,
}

impl PedestrianRouteRequest<'_> {
    /// Build the request body for one origin/destination/variant triple.
    #[must_use]
    pub fn new(origin: Coord<f64>, destination: Coord<f64>, variant: RouteVariant) -> Self {
        Self {
            start_x: origin.x.to_string(),
            start_y: origin.y.to_string(),
            end_x: destination.x.to_string(),
            end_y: destination.y.to_string(),
            req_coord_type: WGS84,
            res_coord_type: WGS84,
            start_name: "origin",
            end_name: "destination",
            search_option: search_option(variant),
        }
    }
}

/// Feature collection returned by the route API.
#[derive(Debug, Default, Deserialize)]
pub struct RouteResponse {
    /// Route features; absent when the provider found nothing.
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
    /// Error payload some failures carry in place of features.
    #[serde(default)]
    pub error: Option<ServiceError>,
}

/// Application-level error reported by the route API.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceError {
    /// Provider error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub message: Option<String>,
}

/// One `GeoJSON` feature.
#[derive(Debug, Deserialize)]
pub struct Feature {
    /// Feature geometry, if any.
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Distance and time of the stretch.
    #[serde(default)]
    pub properties: Properties,
}

/// Feature geometry, tagged by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Walked polyline as `[lon, lat]` pairs.
    LineString {
        /// Polyline vertices.
        coordinates: Vec<[f64; 2]>,
    },
    /// Turn marker or other geometry without route coordinates.
    #[serde(other)]
    Other,
}

/// Per-feature route properties.
#[derive(Debug, Default, Deserialize)]
pub struct Properties {
    /// Length of the stretch in metres.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Walking time of the stretch in seconds.
    #[serde(default)]
    pub time: Option<f64>,
}

impl RouteResponse {
    /// Convert the response into route segments, one per feature.
    ///
    /// A response without features yields no segments.
    ///
    /// # Errors
    /// Returns [`ProviderError::Service`] when the body carries an error
    /// payload.
    pub fn into_segments(self) -> Result<Vec<RouteSegment>, ProviderError> {
        if let Some(error) = self.error {
            return Err(ProviderError::Service {
                code: error.code.unwrap_or_default(),
                message: error.message.unwrap_or_default(),
            });
        }
        Ok(self
            .features
            .unwrap_or_default()
            .into_iter()
            .map(Feature::into_segment)
            .collect())
    }
}

impl Feature {
    fn into_segment(self) -> RouteSegment {
        let coordinates = match self.geometry {
            Some(Geometry::LineString { coordinates }) => coordinates
                .into_iter()
                .map(|[lon, lat]| Coord { x: lon, y: lat })
                .collect(),
            Some(Geometry::Other) | None => Vec::new(),
        };
        RouteSegment::new(
            coordinates,
            self.properties.distance.unwrap_or_default(),
            self.properties.time.unwrap_or_default(),
        )
    }
}
