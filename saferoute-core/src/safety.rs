//! Safety grades and per-route assessments.
//!
//! A route's grade combines how much of it lies near a facility (the coverage
//! ratio) with how many distinct facilities it passes (the safety points).
//!
//! | condition                                   | grade |
//! |---------------------------------------------|-------|
//! | `coverage ≥ 80` and `points ≥ 6`            | A     |
//! | `coverage ≥ 60` and `points ≥ 4`            | B     |
//! | `coverage ≥ 40` and `points ≥ 2`            | C     |
//! | otherwise                                   | D     |

use crate::{FacilityPoint, RoutePath};

/// Letter grade summarising a route's safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SafetyGrade {
    /// Well covered and dense with facilities.
    A,
    /// Mostly covered.
    B,
    /// Partially covered.
    C,
    /// Poorly covered.
    D,
}

impl SafetyGrade {
    /// Grade a route from its coverage ratio and distinct facility counts.
    ///
    /// # Examples
    /// ```
    /// use saferoute_core::SafetyGrade;
    ///
    /// assert_eq!(SafetyGrade::from_metrics(85.0, 5, 3), SafetyGrade::A);
    /// assert_eq!(SafetyGrade::from_metrics(65.0, 3, 1), SafetyGrade::B);
    /// assert_eq!(SafetyGrade::from_metrics(0.0, 0, 0), SafetyGrade::D);
    /// ```
    #[must_use]
    pub fn from_metrics(
        coverage_ratio: f64,
        surveillance_count: usize,
        commerce_count: usize,
    ) -> Self {
        let points = total_safety_points(surveillance_count, commerce_count);
        if coverage_ratio >= 80.0 && points >= 6.0 {
            Self::A
        } else if coverage_ratio >= 60.0 && points >= 4.0 {
            Self::B
        } else if coverage_ratio >= 40.0 && points >= 2.0 {
            Self::C
        } else {
            Self::D
        }
    }

    /// Base ranking score contributed by the grade.
    #[must_use]
    pub const fn base_score(self) -> f64 {
        match self {
            Self::A => 100.0,
            Self::B => 70.0,
            Self::C => 30.0,
            Self::D => 0.0,
        }
    }

    /// Return the grade letter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl std::fmt::Display for SafetyGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted facility count: each camera counts 1.5, each store 0.5.
///
/// # Examples
/// ```
/// use saferoute_core::total_safety_points;
///
/// assert_eq!(total_safety_points(5, 3), 9.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "facility counts are weighted with fractional multipliers"
)]
#[must_use]
pub fn total_safety_points(surveillance_count: usize, commerce_count: usize) -> f64 {
    let surveillance = surveillance_count as f64;
    let commerce = commerce_count as f64;
    surveillance + surveillance * 0.5 + commerce * 0.5
}

/// Safety summary attached to exactly one route.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SafetyAssessment {
    grade: SafetyGrade,
    surveillance_count: usize,
    commerce_count: usize,
    coverage_ratio: f64,
}

impl SafetyAssessment {
    /// Build an assessment from a coverage ratio and distinct facility counts.
    ///
    /// The ratio is clamped to `0.0..=100.0`; `NaN` becomes `0.0`. The grade
    /// is derived from the clamped values.
    #[must_use]
    pub fn new(coverage_ratio: f64, surveillance_count: usize, commerce_count: usize) -> Self {
        let clamped = if coverage_ratio.is_nan() {
            0.0
        } else {
            coverage_ratio.clamp(0.0, 100.0)
        };
        Self {
            grade: SafetyGrade::from_metrics(clamped, surveillance_count, commerce_count),
            surveillance_count,
            commerce_count,
            coverage_ratio: clamped,
        }
    }

    /// Build an assessment from raw segment counts.
    ///
    /// `covered_segments` may exceed `total_segments` because surveillance and
    /// commerce hits on the same point are counted separately; the ratio is
    /// capped at 100. A route without segments has a ratio of zero.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "coverage is a percentage of segment counts"
    )]
    #[must_use]
    pub fn from_coverage(
        covered_segments: usize,
        total_segments: usize,
        surveillance_count: usize,
        commerce_count: usize,
    ) -> Self {
        let ratio = if total_segments == 0 {
            0.0
        } else {
            (covered_segments as f64 / total_segments as f64 * 100.0).min(100.0)
        };
        Self::new(ratio, surveillance_count, commerce_count)
    }

    /// Letter grade.
    #[must_use]
    pub const fn grade(&self) -> SafetyGrade {
        self.grade
    }

    /// Distinct surveillance points near the route.
    #[must_use]
    pub const fn surveillance_count(&self) -> usize {
        self.surveillance_count
    }

    /// Distinct commerce points near the route.
    #[must_use]
    pub const fn commerce_count(&self) -> usize {
        self.commerce_count
    }

    /// Coverage ratio in `0.0..=100.0`.
    #[must_use]
    pub const fn coverage_ratio(&self) -> f64 {
        self.coverage_ratio
    }

    /// Coverage ratio rounded to a whole percentage.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the ratio is clamped to 0..=100 before rounding"
    )]
    #[must_use]
    pub fn coverage_percent(&self) -> u8 {
        self.coverage_ratio.round() as u8
    }

    /// Weighted facility count used by the grade thresholds.
    #[must_use]
    pub fn total_safety_points(&self) -> f64 {
        total_safety_points(self.surveillance_count, self.commerce_count)
    }
}

/// A route together with its safety assessment and the facilities it passes.
///
/// Facility lists hold distinct points in the order they were first matched
/// while walking the route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScoredRoute {
    /// The walking route.
    pub route: RoutePath,
    /// Safety summary for `route`.
    pub safety: SafetyAssessment,
    /// Distinct surveillance points within range of the route.
    pub nearby_surveillance: Vec<FacilityPoint>,
    /// Distinct commerce points within range of the route.
    pub nearby_commerce: Vec<FacilityPoint>,
}
