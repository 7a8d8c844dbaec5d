//! Safety-relevant facilities found near a route.
//!
//! Two disjoint kinds are modelled: fixed surveillance points (CCTV-like) and
//! commercial establishments that stay open and lit (convenience stores).
//! Each kind carries its own coverage radius.

use geo::Coord;

use crate::location::{CoordinateError, coordinate_key, validate_coordinate};

/// Kind of facility a point represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FacilityKind {
    /// Fixed surveillance camera installation.
    Surveillance,
    /// Commercial establishment such as a convenience store.
    Commerce,
}

impl FacilityKind {
    /// Distance within which a facility of this kind covers a route point.
    ///
    /// # Examples
    /// ```
    /// use saferoute_core::FacilityKind;
    ///
    /// assert_eq!(FacilityKind::Surveillance.coverage_radius_metres(), 60.0);
    /// assert_eq!(FacilityKind::Commerce.coverage_radius_metres(), 70.0);
    /// ```
    #[must_use]
    pub const fn coverage_radius_metres(self) -> f64 {
        match self {
            Self::Surveillance => 60.0,
            Self::Commerce => 70.0,
        }
    }

    /// Return the kind as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Surveillance => "surveillance",
            Self::Commerce => "commerce",
        }
    }
}

impl std::fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to a surveillance point.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SurveillanceDetails {
    /// Street address of the installation, when published.
    pub address: Option<String>,
    /// Declared installation purpose (crime prevention, traffic, ...).
    pub purpose: Option<String>,
    /// Number of cameras at the installation; at least one.
    pub camera_count: u32,
}

impl Default for SurveillanceDetails {
    fn default() -> Self {
        Self {
            address: None,
            purpose: None,
            camera_count: 1,
        }
    }
}

/// Metadata attached to a commerce point.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommerceDetails {
    /// Display name of the establishment.
    pub name: String,
    /// Road or lot address.
    pub address: Option<String>,
    /// Distance from the search centre reported by the provider, in metres.
    pub distance_metres: Option<f64>,
}

/// Kind-specific metadata for a [`FacilityPoint`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum FacilityDetails {
    /// Surveillance installation metadata.
    Surveillance(SurveillanceDetails),
    /// Commerce establishment metadata.
    Commerce(CommerceDetails),
}

/// A facility with a validated location.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::{FacilityKind, FacilityPoint, SurveillanceDetails};
///
/// let cctv = FacilityPoint::surveillance(
///     Coord { x: 126.9780, y: 37.5665 },
///     SurveillanceDetails::default(),
/// )?;
/// assert_eq!(cctv.kind(), FacilityKind::Surveillance);
/// # Ok::<(), saferoute_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FacilityPoint {
    location: Coord<f64>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    details: FacilityDetails,
}

impl FacilityPoint {
    /// Validate `location` and construct a facility.
    pub fn new(location: Coord<f64>, details: FacilityDetails) -> Result<Self, CoordinateError> {
        Ok(Self {
            location: validate_coordinate(location)?,
            details,
        })
    }

    /// Construct a surveillance point.
    pub fn surveillance(
        location: Coord<f64>,
        details: SurveillanceDetails,
    ) -> Result<Self, CoordinateError> {
        Self::new(location, FacilityDetails::Surveillance(details))
    }

    /// Construct a commerce point.
    pub fn commerce(
        location: Coord<f64>,
        details: CommerceDetails,
    ) -> Result<Self, CoordinateError> {
        Self::new(location, FacilityDetails::Commerce(details))
    }

    /// Facility position.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        self.location
    }

    /// Kind-specific metadata.
    #[must_use]
    pub const fn details(&self) -> &FacilityDetails {
        &self.details
    }

    /// Facility kind, derived from its metadata.
    #[must_use]
    pub const fn kind(&self) -> FacilityKind {
        match self.details {
            FacilityDetails::Surveillance(_) => FacilityKind::Surveillance,
            FacilityDetails::Commerce(_) => FacilityKind::Commerce,
        }
    }

    /// Identity used when counting distinct facilities.
    ///
    /// Two facilities are the same when their coordinates are bit-identical,
    /// regardless of metadata.
    #[must_use]
    pub fn identity(&self) -> (u64, u64) {
        coordinate_key(self.location)
    }
}
