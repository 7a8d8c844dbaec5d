//! Walking routes returned by a pedestrian-routing provider.
//!
//! Providers answer with a list of [`RouteSegment`]s; [`RoutePath::from_segments`]
//! merges them into one travel-ordered polyline with aggregate distance and
//! time.

use std::collections::HashSet;

use geo::Coord;
use thiserror::Error;

use crate::location::{CoordinateError, coordinate_key, validate_coordinate};

/// Path-finding strategy requested from the routing provider.
///
/// [`RouteVariant::ALL`] lists the variants in the order candidates are
/// requested and, on score ties, preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RouteVariant {
    /// Provider's recommended route.
    Recommended,
    /// Route preferring main roads.
    ArterialPriority,
    /// Shortest walking distance.
    Shortest,
}

impl RouteVariant {
    /// Every variant, in request and tie-break order.
    pub const ALL: [Self; 3] = [Self::Recommended, Self::ArterialPriority, Self::Shortest];

    /// Return the variant as a kebab-case `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::ArterialPriority => "arterial-priority",
            Self::Shortest => "shortest",
        }
    }
}

impl std::fmt::Display for RouteVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One linear piece of a provider response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteSegment {
    /// Ordered coordinates along the segment.
    pub coordinates: Vec<Coord<f64>>,
    /// Segment length in metres.
    pub distance_metres: f64,
    /// Walking time in seconds.
    pub time_seconds: f64,
}

impl RouteSegment {
    /// Construct a segment.
    #[must_use]
    pub const fn new(coordinates: Vec<Coord<f64>>, distance_metres: f64, time_seconds: f64) -> Self {
        Self {
            coordinates,
            distance_metres,
            time_seconds,
        }
    }
}

/// Errors returned when building a [`RoutePath`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The route carried no coordinates.
    #[error("route contains no coordinates")]
    Empty,
    /// A coordinate in the route geometry was unusable.
    #[error("route coordinate {index} is invalid: {source}")]
    InvalidCoordinate {
        /// Position of the coordinate in the merged geometry.
        index: usize,
        /// Validation failure.
        #[source]
        source: CoordinateError,
    },
}

/// A complete walking route from origin to destination.
///
/// The point sequence is never empty and stays in travel order.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::{RoutePath, RouteSegment, RouteVariant};
///
/// let a = Coord { x: 126.9780, y: 37.5665 };
/// let b = Coord { x: 126.9790, y: 37.5670 };
/// let c = Coord { x: 126.9800, y: 37.5675 };
/// let path = RoutePath::from_segments(
///     RouteVariant::Shortest,
///     vec![
///         RouteSegment::new(vec![a, b], 100.0, 80.0),
///         RouteSegment::new(vec![b, c], 120.0, 95.0),
///     ],
/// )?;
/// assert_eq!(path.points(), &[a, b, c]);
/// assert_eq!(path.total_distance_metres(), 220.0);
/// # Ok::<(), saferoute_core::RouteError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoutePath {
    variant: RouteVariant,
    points: Vec<Coord<f64>>,
    total_distance_metres: f64,
    total_time_seconds: f64,
}

impl RoutePath {
    /// Validate and construct a route from an already merged point list.
    pub fn new(
        variant: RouteVariant,
        points: Vec<Coord<f64>>,
        total_distance_metres: f64,
        total_time_seconds: f64,
    ) -> Result<Self, RouteError> {
        if points.is_empty() {
            return Err(RouteError::Empty);
        }
        for (index, point) in points.iter().enumerate() {
            validate_coordinate(*point)
                .map_err(|source| RouteError::InvalidCoordinate { index, source })?;
        }
        Ok(Self {
            variant,
            points,
            total_distance_metres,
            total_time_seconds,
        })
    }

    /// Merge provider segments into one route.
    ///
    /// Coordinates are concatenated in segment order and every repeated
    /// coordinate is dropped, keeping its first occurrence. Distance and time
    /// are summed over all segments, including those without geometry.
    #[expect(
        clippy::float_arithmetic,
        reason = "segment distances and times are summed"
    )]
    pub fn from_segments<I>(variant: RouteVariant, segments: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = RouteSegment>,
    {
        let mut seen = HashSet::new();
        let mut points = Vec::new();
        let mut distance = 0.0;
        let mut time = 0.0;
        for segment in segments {
            distance += segment.distance_metres;
            time += segment.time_seconds;
            points.extend(
                segment
                    .coordinates
                    .into_iter()
                    .filter(|coord| seen.insert(coordinate_key(*coord))),
            );
        }
        Self::new(variant, points, distance, time)
    }

    /// Strategy that produced this route.
    #[must_use]
    pub const fn variant(&self) -> RouteVariant {
        self.variant
    }

    /// Route coordinates in travel order.
    #[must_use]
    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    /// Total length in metres as reported by the provider.
    #[must_use]
    pub const fn total_distance_metres(&self) -> f64 {
        self.total_distance_metres
    }

    /// Total walking time in seconds as reported by the provider.
    #[must_use]
    pub const fn total_time_seconds(&self) -> f64 {
        self.total_time_seconds
    }
}
