//! Concurrent retrieval of candidate routes.

use std::time::Duration;

use futures_util::future::try_join_all;
use geo::Coord;
use log::warn;
use saferoute_core::{
    ProviderError, RoutePath, RouteProvider, RouteRequest, RouteVariant, SafeRouteError,
    validate_coordinate,
};

/// Default bound on a single variant request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Requests route variants from a [`RouteProvider`] and normalises them.
///
/// Every variant is requested concurrently. Segments are merged into one
/// [`RoutePath`] per variant; variants without usable geometry are dropped
/// with a warning, while any provider failure aborts the whole request.
#[derive(Debug)]
pub struct RoutingClient<P> {
    provider: P,
    variants: Vec<RouteVariant>,
    timeout: Duration,
}

impl<P: RouteProvider> RoutingClient<P> {
    /// Request every variant in canonical order.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            variants: RouteVariant::ALL.to_vec(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Restrict or reorder the requested variants.
    ///
    /// Selection ties go to the earliest variant in this list.
    #[must_use]
    pub fn with_variants(mut self, variants: impl Into<Vec<RouteVariant>>) -> Self {
        self.variants = variants.into();
        self
    }

    /// Bound each variant request by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Variants requested by [`RoutingClient::fetch_candidates`].
    #[must_use]
    pub fn variants(&self) -> &[RouteVariant] {
        &self.variants
    }

    /// Underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetch one route per configured variant.
    ///
    /// Routes are returned in variant order with invalid variants omitted.
    ///
    /// # Errors
    /// - [`SafeRouteError::InvalidCoordinate`] before any request when either
    ///   endpoint is unusable.
    /// - [`SafeRouteError::ProviderUnavailable`] as soon as any variant
    ///   request fails or times out; outstanding requests are dropped.
    /// - [`SafeRouteError::NoValidRoute`] when no variant produced geometry.
    pub async fn fetch_candidates(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<RoutePath>, SafeRouteError> {
        let start = validate_coordinate(origin)?;
        let end = validate_coordinate(destination)?;
        let requests = self.variants.iter().map(|&variant| {
            let request = RouteRequest {
                origin: start,
                destination: end,
                variant,
            };
            async move {
                match self.fetch_path(&request).await {
                    Err(err @ SafeRouteError::RouteInvalid { .. }) => {
                        warn!("dropping candidate: {err}");
                        Ok(None)
                    }
                    other => other.map(Some),
                }
            }
        });
        let routes: Vec<RoutePath> = try_join_all(requests).await?.into_iter().flatten().collect();
        if routes.is_empty() {
            return Err(SafeRouteError::NoValidRoute);
        }
        Ok(routes)
    }

    /// Fetch a single variant without scoring it.
    ///
    /// # Errors
    /// Returns [`SafeRouteError::InvalidCoordinate`] for unusable endpoints,
    /// [`SafeRouteError::ProviderUnavailable`] when the request fails and
    /// [`SafeRouteError::RouteInvalid`] when the route has no usable
    /// geometry.
    pub async fn fetch_single(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        variant: RouteVariant,
    ) -> Result<RoutePath, SafeRouteError> {
        let request = RouteRequest {
            origin: validate_coordinate(origin)?,
            destination: validate_coordinate(destination)?,
            variant,
        };
        self.fetch_path(&request).await
    }

    async fn fetch_path(&self, request: &RouteRequest) -> Result<RoutePath, SafeRouteError> {
        let segments = tokio::time::timeout(self.timeout, self.provider.fetch_route(request))
            .await
            .map_err(|_elapsed| {
                SafeRouteError::from_routing(ProviderError::Timeout {
                    target: format!("{} route", request.variant),
                    timeout_secs: self.timeout.as_secs(),
                })
            })?
            .map_err(SafeRouteError::from_routing)?;
        RoutePath::from_segments(request.variant, segments).map_err(|reason| {
            SafeRouteError::RouteInvalid {
                variant: request.variant,
                reason,
            }
        })
    }
}
