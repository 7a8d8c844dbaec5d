//! Match route points against nearby facilities.
//!
//! A facility covers a route point when the Haversine distance between them
//! is at most the coverage radius for its kind. Candidates are first pruned
//! with [`within_rough_bounds`] so the trigonometry only runs on neighbours.

use std::collections::HashSet;

use geo::Coord;

use crate::{FacilityKind, FacilityPoint, haversine_distance, within_rough_bounds};

/// Radius-bounded matcher over one facility list.
#[derive(Debug, Clone, Copy)]
pub struct FacilityMatcher<'a> {
    facilities: &'a [FacilityPoint],
    radius_metres: f64,
}

impl<'a> FacilityMatcher<'a> {
    /// Match `facilities` within `radius_metres`.
    #[must_use]
    pub const fn new(facilities: &'a [FacilityPoint], radius_metres: f64) -> Self {
        Self {
            facilities,
            radius_metres,
        }
    }

    /// Match `facilities` using the coverage radius of `kind`.
    #[must_use]
    pub const fn for_kind(facilities: &'a [FacilityPoint], kind: FacilityKind) -> Self {
        Self::new(facilities, kind.coverage_radius_metres())
    }

    /// Facilities covering `point`, in input order.
    pub fn matches(&self, point: Coord<f64>) -> impl Iterator<Item = &'a FacilityPoint> + '_ {
        let radius = self.radius_metres;
        self.facilities.iter().filter(move |facility| {
            let location = facility.location();
            within_rough_bounds(point, location, radius)
                && haversine_distance(point, location) <= radius
        })
    }

    /// Whether any facility covers `point`.
    #[must_use]
    pub fn covers(&self, point: Coord<f64>) -> bool {
        self.matches(point).next().is_some()
    }
}

/// Raw coverage counts gathered while walking a route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageTally {
    /// Points covered by surveillance plus points covered by commerce.
    ///
    /// A point near both kinds counts twice.
    pub covered_segments: usize,
    /// Distinct surveillance facilities, in first-matched order.
    pub surveillance: Vec<FacilityPoint>,
    /// Distinct commerce facilities, in first-matched order.
    pub commerce: Vec<FacilityPoint>,
}

/// Walk `points` and tally coverage against both facility kinds.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::{FacilityPoint, SurveillanceDetails, tally_coverage};
///
/// let point = Coord { x: 126.9780, y: 37.5665 };
/// let cctv = FacilityPoint::surveillance(point, SurveillanceDetails::default())?;
/// let tally = tally_coverage(&[point, point], &[cctv], &[]);
/// assert_eq!(tally.covered_segments, 2);
/// assert_eq!(tally.surveillance.len(), 1);
/// # Ok::<(), saferoute_core::CoordinateError>(())
/// ```
#[must_use]
pub fn tally_coverage(
    points: &[Coord<f64>],
    surveillance: &[FacilityPoint],
    commerce: &[FacilityPoint],
) -> CoverageTally {
    let cameras = FacilityMatcher::for_kind(surveillance, FacilityKind::Surveillance);
    let stores = FacilityMatcher::for_kind(commerce, FacilityKind::Commerce);
    let mut tally = CoverageTally::default();
    let mut seen_cameras = HashSet::new();
    let mut seen_stores = HashSet::new();

    for &point in points {
        if collect_distinct(cameras.matches(point), &mut seen_cameras, &mut tally.surveillance) {
            tally.covered_segments += 1;
        }
        if collect_distinct(stores.matches(point), &mut seen_stores, &mut tally.commerce) {
            tally.covered_segments += 1;
        }
    }
    tally
}

/// Record unseen facilities from `hits`; return whether there was any hit.
fn collect_distinct<'a>(
    hits: impl Iterator<Item = &'a FacilityPoint>,
    seen: &mut HashSet<(u64, u64)>,
    out: &mut Vec<FacilityPoint>,
) -> bool {
    let mut any = false;
    for facility in hits {
        any = true;
        if seen.insert(facility.identity()) {
            out.push(facility.clone());
        }
    }
    any
}
