//! Rank scored candidates and pick the safest.

use crate::{SafetyAssessment, ScoredRoute};

/// Ranking score for a safety assessment.
///
/// `base(grade) + min(2 · surveillance, 20) + min(commerce, 10) + 0.2 · coverage`,
/// where coverage is the rounded percentage.
///
/// # Examples
/// ```
/// use saferoute_core::{SafetyAssessment, route_score};
///
/// let assessment = SafetyAssessment::new(85.0, 5, 3);
/// // A grade, five cameras, three stores, 85 % coverage.
/// assert!((route_score(&assessment) - 130.0).abs() < 1e-9);
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the score is a weighted floating-point sum"
)]
#[must_use]
pub fn route_score(assessment: &SafetyAssessment) -> f64 {
    let surveillance = (assessment.surveillance_count().saturating_mul(2)).min(20) as f64;
    let commerce = assessment.commerce_count().min(10) as f64;
    let coverage = f64::from(assessment.coverage_percent()) * 0.2;
    assessment.grade().base_score() + surveillance + commerce + coverage
}

/// Return the candidate with the highest [`route_score`].
///
/// Candidates are visited in order and a later one only wins with a strictly
/// greater score, so ties go to the earliest. Returns `None` for an empty
/// input.
#[must_use]
pub fn select_best_route<I>(candidates: I) -> Option<ScoredRoute>
where
    I: IntoIterator<Item = ScoredRoute>,
{
    let mut best: Option<(f64, ScoredRoute)> = None;
    for candidate in candidates {
        let score = route_score(&candidate.safety);
        match &best {
            Some((best_score, _)) if score <= *best_score => {}
            _ => best = Some((score, candidate)),
        }
    }
    best.map(|(_, route)| route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RoutePath, RouteVariant, SafetyGrade};
    use geo::Coord;
    use rstest::rstest;

    fn candidate(variant: RouteVariant, assessment: SafetyAssessment) -> ScoredRoute {
        let route = RoutePath::new(
            variant,
            vec![Coord {
                x: 126.978,
                y: 37.566,
            }],
            100.0,
            80.0,
        )
        .expect("valid route");
        ScoredRoute {
            route,
            safety: assessment,
            nearby_surveillance: Vec::new(),
            nearby_commerce: Vec::new(),
        }
    }

    #[rstest]
    #[case(SafetyAssessment::new(85.0, 5, 3), 130.0)]
    #[case(SafetyAssessment::new(65.0, 3, 1), 70.0 + 6.0 + 1.0 + 13.0)]
    #[case(SafetyAssessment::new(100.0, 15, 15), 100.0 + 20.0 + 10.0 + 20.0)]
    #[case(SafetyAssessment::new(0.0, 0, 0), 0.0)]
    fn scores_combine_grade_counts_and_coverage(
        #[case] assessment: SafetyAssessment,
        #[case] expected: f64,
    ) {
        assert!((route_score(&assessment) - expected).abs() < 1e-9);
    }

    #[rstest]
    fn empty_input_selects_nothing() {
        assert!(select_best_route(Vec::<ScoredRoute>::new()).is_none());
    }

    #[rstest]
    fn single_candidate_is_selected() {
        let only = candidate(RouteVariant::Shortest, SafetyAssessment::new(10.0, 0, 0));
        let best = select_best_route(vec![only.clone()]);
        assert_eq!(best, Some(only));
    }

    #[rstest]
    fn ties_go_to_the_earliest_candidate() {
        let assessment = SafetyAssessment::new(50.0, 2, 2);
        let chosen = select_best_route(
            RouteVariant::ALL
                .into_iter()
                .map(|variant| candidate(variant, assessment)),
        )
        .expect("candidate");
        assert_eq!(chosen.route.variant(), RouteVariant::Recommended);
    }

    #[rstest]
    fn higher_score_wins_regardless_of_position() {
        let chosen = select_best_route(vec![
            candidate(RouteVariant::Recommended, SafetyAssessment::new(65.0, 3, 1)),
            candidate(RouteVariant::ArterialPriority, SafetyAssessment::new(0.0, 0, 0)),
            candidate(RouteVariant::Shortest, SafetyAssessment::new(85.0, 5, 3)),
        ])
        .expect("candidate");
        assert_eq!(chosen.route.variant(), RouteVariant::Shortest);
        assert_eq!(chosen.safety.grade(), SafetyGrade::A);
    }
}
