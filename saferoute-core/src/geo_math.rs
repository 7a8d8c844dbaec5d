//! Great-circle distance and a cheap bounding-box rejection test.

use geo::Coord;

/// Mean Earth radius used for Haversine distances, in metres.
pub const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// Approximate length of one degree of latitude, in metres.
pub const METRES_PER_DEGREE: f64 = 111_000.0;

/// Haversine distance between two coordinates, in metres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::haversine_distance;
///
/// let a = Coord { x: 126.9780, y: 37.5665 };
/// assert_eq!(haversine_distance(a, a), 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "the Haversine formula is floating-point trigonometry"
)]
#[must_use]
pub fn haversine_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let phi_a = a.y.to_radians();
    let phi_b = b.y.to_radians();
    let delta_phi = (b.y - a.y).to_radians();
    let delta_lambda = (b.x - a.x).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METRES * central_angle
}

/// Report whether `candidate` might lie within `radius_metres` of `origin`.
///
/// The test treats a degree of latitude as [`METRES_PER_DEGREE`] and scales
/// longitude by the cosine of `origin`'s latitude. It only ever rejects: a
/// `true` result must still be confirmed with [`haversine_distance`].
#[expect(
    clippy::float_arithmetic,
    reason = "degree deltas are scaled to metres"
)]
#[must_use]
pub fn within_rough_bounds(origin: Coord<f64>, candidate: Coord<f64>, radius_metres: f64) -> bool {
    let lat_delta = (origin.y - candidate.y).abs() * METRES_PER_DEGREE;
    let lon_delta =
        (origin.x - candidate.x).abs() * METRES_PER_DEGREE * origin.y.to_radians().cos();
    lat_delta <= radius_metres && lon_delta <= radius_metres
}
