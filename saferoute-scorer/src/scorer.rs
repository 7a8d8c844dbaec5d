//! Per-route safety assessment.

use std::sync::Arc;

use futures_util::future::try_join_all;
use geo::Coord;
use log::debug;
use saferoute_core::{
    CommerceSource, DEFAULT_MAX_POINTS, FacilityPoint, ProviderKind, RoutePath, SafeRouteError,
    SafetyAssessment, ScoredRoute, decimate, tally_coverage,
};

use crate::{CacheKey, StoreLookupCache};

/// Grades routes against surveillance and commerce coverage.
#[derive(Debug)]
pub struct SafetyScorer<C> {
    commerce: C,
    cache: Arc<StoreLookupCache>,
    max_points: usize,
}

impl<C: CommerceSource> SafetyScorer<C> {
    /// Create a scorer that searches `commerce` through `cache`.
    #[must_use]
    pub const fn new(commerce: C, cache: Arc<StoreLookupCache>) -> Self {
        Self {
            commerce,
            cache,
            max_points: DEFAULT_MAX_POINTS,
        }
    }

    /// Override the decimation bound; zero scores every point.
    #[must_use]
    pub const fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    /// Shared commerce cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<StoreLookupCache> {
        &self.cache
    }

    /// Assess a single route.
    ///
    /// The route is thinned to the decimation bound, commerce is looked up
    /// once around the thinned midpoint, and every thinned point is checked
    /// against both facility lists. Coverage is measured over
    /// `thinned_len - 1` segments.
    ///
    /// # Errors
    /// Returns [`SafeRouteError::ProviderUnavailable`] or
    /// [`SafeRouteError::DatasetParse`] when the commerce lookup fails.
    pub async fn assess(
        &self,
        route: &RoutePath,
        surveillance: &[FacilityPoint],
    ) -> Result<ScoredRoute, SafeRouteError> {
        let points = decimate(route.points(), self.max_points);
        let commerce = self.commerce_near(&points).await?;
        let tally = tally_coverage(&points, surveillance, &commerce);
        let safety = SafetyAssessment::from_coverage(
            tally.covered_segments,
            points.len().saturating_sub(1),
            tally.surveillance.len(),
            tally.commerce.len(),
        );
        debug!(
            "{} route graded {} ({}% coverage, {} cameras, {} stores)",
            route.variant(),
            safety.grade(),
            safety.coverage_percent(),
            safety.surveillance_count(),
            safety.commerce_count(),
        );
        Ok(ScoredRoute {
            route: route.clone(),
            safety,
            nearby_surveillance: tally.surveillance,
            nearby_commerce: tally.commerce,
        })
    }

    /// Assess every route concurrently, preserving input order.
    ///
    /// # Errors
    /// Fails with the first error any assessment produces; the remaining
    /// assessments are dropped.
    pub async fn assess_all(
        &self,
        routes: &[RoutePath],
        surveillance: &[FacilityPoint],
    ) -> Result<Vec<ScoredRoute>, SafeRouteError> {
        try_join_all(routes.iter().map(|route| self.assess(route, surveillance))).await
    }

    async fn commerce_near(
        &self,
        points: &[Coord<f64>],
    ) -> Result<Arc<[FacilityPoint]>, SafeRouteError> {
        let Some(&midpoint) = points.get(midpoint_index(points.len())) else {
            return Ok(Arc::from(Vec::new()));
        };
        self.cache
            .get_or_fetch(CacheKey::from_coord(midpoint), || {
                self.commerce.nearby_commerce(midpoint)
            })
            .await
            .map_err(|err| SafeRouteError::from_dataset(ProviderKind::Commerce, err))
    }
}

#[expect(
    clippy::integer_division,
    reason = "the midpoint is the element at floor(len / 2)"
)]
const fn midpoint_index(len: usize) -> usize {
    len / 2
}
