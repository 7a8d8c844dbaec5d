//! Coordinate parsing and validation.
//!
//! Callers and providers hand the engine raw numbers; everything that enters
//! the scoring pipeline passes through [`validate_coordinate`] first so that a
//! malformed record cannot turn into a `NaN` distance further down.

use geo::Coord;
use thiserror::Error;

/// Errors raised when a coordinate cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// The input was not a `lat,lng` pair.
    #[error("coordinate must be formatted as \"lat,lng\", got {input:?}")]
    Malformed {
        /// Raw input string.
        input: String,
    },
    /// One component was not a number.
    #[error("{axis} value {raw:?} is not a number")]
    NotANumber {
        /// Name of the offending axis.
        axis: &'static str,
        /// Raw component text.
        raw: String,
    },
    /// One component was `NaN` or infinite.
    #[error("{axis} must be finite")]
    NonFinite {
        /// Name of the offending axis.
        axis: &'static str,
    },
    /// Latitude fell outside `-90..=90`.
    #[error("latitude {value} is outside -90..=90")]
    LatitudeOutOfRange {
        /// Rejected latitude.
        value: f64,
    },
    /// Longitude fell outside `-180..=180`.
    #[error("longitude {value} is outside -180..=180")]
    LongitudeOutOfRange {
        /// Rejected longitude.
        value: f64,
    },
}

/// Check that a coordinate is finite and inside WGS84 bounds.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::validate_coordinate;
///
/// assert!(validate_coordinate(Coord { x: 126.97, y: 37.56 }).is_ok());
/// assert!(validate_coordinate(Coord { x: f64::NAN, y: 37.56 }).is_err());
/// ```
pub fn validate_coordinate(coord: Coord<f64>) -> Result<Coord<f64>, CoordinateError> {
    if !coord.y.is_finite() {
        return Err(CoordinateError::NonFinite { axis: "latitude" });
    }
    if !coord.x.is_finite() {
        return Err(CoordinateError::NonFinite { axis: "longitude" });
    }
    if !(-90.0..=90.0).contains(&coord.y) {
        return Err(CoordinateError::LatitudeOutOfRange { value: coord.y });
    }
    if !(-180.0..=180.0).contains(&coord.x) {
        return Err(CoordinateError::LongitudeOutOfRange { value: coord.x });
    }
    Ok(coord)
}

/// Parse a `"lat,lng"` string into a validated coordinate.
///
/// # Examples
/// ```
/// use saferoute_core::parse_lat_lng;
///
/// let coord = parse_lat_lng("37.5665, 126.9780")?;
/// assert_eq!(coord.y, 37.5665);
/// assert_eq!(coord.x, 126.9780);
/// # Ok::<(), saferoute_core::CoordinateError>(())
/// ```
pub fn parse_lat_lng(input: &str) -> Result<Coord<f64>, CoordinateError> {
    let (lat_raw, lng_raw) = input
        .split_once(',')
        .ok_or_else(|| CoordinateError::Malformed {
            input: input.to_owned(),
        })?;
    let lat = parse_axis(lat_raw, "latitude")?;
    let lng = parse_axis(lng_raw, "longitude")?;
    validate_coordinate(Coord { x: lng, y: lat })
}

fn parse_axis(raw: &str, axis: &'static str) -> Result<f64, CoordinateError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CoordinateError::NotANumber {
            axis,
            raw: raw.trim().to_owned(),
        })
}

/// Bit-exact identity of a coordinate, used for deduplication.
///
/// `-0.0` and `0.0` map to the same key; every other value keeps its exact
/// bit pattern, so two points are "the same" only when their floating-point
/// values are identical.
#[must_use]
pub fn coordinate_key(coord: Coord<f64>) -> (u64, u64) {
    (canonical_bits(coord.x), canonical_bits(coord.y))
}

#[expect(
    clippy::float_cmp,
    reason = "identity is exact floating-point equality by definition"
)]
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}
