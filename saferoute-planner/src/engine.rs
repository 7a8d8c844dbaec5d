//! Route computation entry points.

use std::sync::Arc;
use std::time::Duration;

use geo::Coord;
use log::info;
use saferoute_core::{
    CommerceSource, DEFAULT_MAX_POINTS, FacilityPoint, ProviderKind, RoutePath, RouteProvider,
    RouteVariant, SafeRouteError, ScoredRoute, SurveillanceSource, select_best_route,
    validate_coordinate,
};
use saferoute_scorer::{SafetyScorer, StoreCacheConfig, StoreLookupCache};

use crate::routing::{DEFAULT_REQUEST_TIMEOUT, RoutingClient};

/// Result of [`SafeRouteEngine::compute_safest_route`].
pub type SafestRoute = ScoredRoute;

/// Configuration for [`SafeRouteEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Candidate variants, in tie-breaking order.
    pub variants: Vec<RouteVariant>,
    /// Bound on each routing request.
    pub request_timeout: Duration,
    /// Decimation bound applied before scoring.
    pub max_points: usize,
    /// Commerce lookup cache settings.
    pub cache: StoreCacheConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            variants: RouteVariant::ALL.to_vec(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_points: DEFAULT_MAX_POINTS,
            cache: StoreCacheConfig::default(),
        }
    }
}

/// Computes shortest and safest walking routes.
///
/// The engine is generic over its three collaborators: a pedestrian route
/// provider, the surveillance dataset and the commerce search. It owns the
/// commerce lookup cache, which persists across requests.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_core::test_support::{
///     StubCommerceSource, StubRouteProvider, StubSurveillanceSource, straight_segment,
/// };
/// use saferoute_planner::SafeRouteEngine;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build()?.block_on(async {
/// let origin = Coord { x: 126.9780, y: 37.5665 };
/// let destination = Coord { x: 126.9780, y: 37.5705 };
/// let provider = StubRouteProvider::default()
///     .with_all_routes(&[straight_segment(origin, destination, 10)]);
/// let engine = SafeRouteEngine::new(
///     provider,
///     StubSurveillanceSource::default(),
///     StubCommerceSource::default(),
/// );
///
/// let safest = engine.compute_safest_route(origin, destination).await?;
/// assert_eq!(safest.safety.grade().as_str(), "D");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SafeRouteEngine<P, S, C> {
    routing: RoutingClient<P>,
    surveillance: S,
    scorer: SafetyScorer<C>,
}

impl<P, S, C> SafeRouteEngine<P, S, C>
where
    P: RouteProvider,
    S: SurveillanceSource,
    C: CommerceSource,
{
    /// Construct an engine using default configuration.
    #[must_use]
    pub fn new(provider: P, surveillance: S, commerce: C) -> Self {
        Self::with_config(provider, surveillance, commerce, EngineConfig::default())
    }

    /// Construct an engine with explicit configuration and a private cache.
    #[must_use]
    pub fn with_config(provider: P, surveillance: S, commerce: C, config: EngineConfig) -> Self {
        let cache = Arc::new(StoreLookupCache::new(config.cache));
        Self::with_cache(provider, surveillance, commerce, config, cache)
    }

    /// Construct an engine sharing an existing commerce cache.
    ///
    /// The cache keeps its own capacity and lifetime; `config.cache` is
    /// ignored.
    #[must_use]
    pub fn with_cache(
        provider: P,
        surveillance: S,
        commerce: C,
        config: EngineConfig,
        cache: Arc<StoreLookupCache>,
    ) -> Self {
        let routing = RoutingClient::new(provider)
            .with_variants(config.variants)
            .with_timeout(config.request_timeout);
        let scorer = SafetyScorer::new(commerce, cache).with_max_points(config.max_points);
        Self {
            routing,
            surveillance,
            scorer,
        }
    }

    /// Routing client used for candidate retrieval.
    #[must_use]
    pub const fn routing(&self) -> &RoutingClient<P> {
        &self.routing
    }

    /// Shared commerce lookup cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<StoreLookupCache> {
        self.scorer.cache()
    }

    /// Fetch the provider's shortest route without scoring it.
    ///
    /// # Errors
    /// Returns [`SafeRouteError::InvalidCoordinate`],
    /// [`SafeRouteError::ProviderUnavailable`] or
    /// [`SafeRouteError::RouteInvalid`].
    pub async fn compute_shortest_route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<RoutePath, SafeRouteError> {
        self.routing
            .fetch_single(origin, destination, RouteVariant::Shortest)
            .await
    }

    /// Fetch every candidate, score each and return the safest.
    ///
    /// The surveillance dataset is loaded concurrently with the candidates.
    /// Any provider failure aborts the request.
    ///
    /// # Errors
    /// - [`SafeRouteError::InvalidCoordinate`] before any outbound call.
    /// - [`SafeRouteError::ProviderUnavailable`] when a provider fails.
    /// - [`SafeRouteError::DatasetParse`] when a dataset is malformed.
    /// - [`SafeRouteError::NoValidRoute`] when no candidate survives.
    pub async fn compute_safest_route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<SafestRoute, SafeRouteError> {
        let start = validate_coordinate(origin)?;
        let end = validate_coordinate(destination)?;
        let (surveillance, candidates) = futures_util::try_join!(
            self.load_surveillance(),
            self.routing.fetch_candidates(start, end),
        )?;
        let scored = self.scorer.assess_all(&candidates, &surveillance).await?;
        let best = select_best_route(scored).ok_or(SafeRouteError::NoValidRoute)?;
        info!(
            "selected {} route: grade {}, {}% coverage over {:.0} m",
            best.route.variant(),
            best.safety.grade(),
            best.safety.coverage_percent(),
            best.route.total_distance_metres(),
        );
        Ok(best)
    }

    async fn load_surveillance(&self) -> Result<Vec<FacilityPoint>, SafeRouteError> {
        self.surveillance
            .fetch_surveillance()
            .await
            .map_err(|err| SafeRouteError::from_dataset(ProviderKind::Surveillance, err))
    }
}
