//! Downsample dense route polylines before scoring.
//!
//! Scoring cost grows with `points × facilities`, so routes are thinned to a
//! representative subset first. The policy is index-based, not arc-length
//! based: with `step = floor(len / max_points)` every `step`-th point is kept,
//! starting at index zero. Coverage thresholds downstream are calibrated to
//! this density.

use std::borrow::Cow;

use geo::Coord;

/// Default upper bound on points fed to the scorer.
pub const DEFAULT_MAX_POINTS: usize = 100;

/// Thin `points` to roughly `max_points` entries.
///
/// Inputs no longer than `max_points` are returned untouched (borrowed).
/// Otherwise indices `0, step, 2·step, …` are kept with
/// `step = floor(len / max_points)`; the final point is only kept when its
/// index is a multiple of `step`. Because `step` is floored, the result holds
/// `ceil(len / step)` points, which may exceed `max_points` for inputs shorter
/// than `2 · max_points`. A `max_points` of zero disables decimation.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::decimate;
///
/// let points: Vec<_> = (0..250)
///     .map(|i| Coord { x: f64::from(i), y: 0.0 })
///     .collect();
/// let thinned = decimate(&points, 100);
/// assert_eq!(thinned.len(), 125);
/// assert_eq!(thinned[1].x, 2.0);
/// ```
#[must_use]
pub fn decimate(points: &[Coord<f64>], max_points: usize) -> Cow<'_, [Coord<f64>]> {
    if max_points == 0 || points.len() <= max_points {
        return Cow::Borrowed(points);
    }
    let step = decimation_step(points.len(), max_points);
    Cow::Owned(points.iter().step_by(step).copied().collect())
}

#[expect(
    clippy::integer_division,
    reason = "the step is defined as floor(len / max_points)"
)]
const fn decimation_step(len: usize, max_points: usize) -> usize {
    len / max_points
}
