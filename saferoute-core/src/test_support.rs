//! Deterministic provider doubles used by unit and behaviour tests.
//!
//! None of the stubs perform I/O. Each one records how often it was called so
//! tests can assert on caching and fail-fast behaviour.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use geo::Coord;

use crate::{
    CommerceSource, FacilityPoint, ProviderError, RouteProvider, RouteRequest, RouteSegment,
    RouteVariant, SurveillanceSource,
};

#[derive(Debug, Clone)]
enum StubResponse<T> {
    Value(T),
    Error(ProviderError),
    Pending,
}

impl<T: Clone> StubResponse<T> {
    async fn resolve(&self) -> Result<T, ProviderError> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Error(error) => Err(error.clone()),
            Self::Pending => std::future::pending().await,
        }
    }
}

/// Stub [`RouteProvider`] answering per variant.
///
/// Variants without a configured response yield no segments, which the
/// engine treats as an invalid route.
#[derive(Debug, Default)]
pub struct StubRouteProvider {
    responses: HashMap<RouteVariant, StubResponse<Vec<RouteSegment>>>,
    calls: AtomicUsize,
}

impl StubRouteProvider {
    /// Answer `variant` with `segments`.
    #[must_use]
    pub fn with_route(mut self, variant: RouteVariant, segments: Vec<RouteSegment>) -> Self {
        self.responses
            .insert(variant, StubResponse::Value(segments));
        self
    }

    /// Answer every variant with `segments`.
    #[must_use]
    pub fn with_all_routes(self, segments: &[RouteSegment]) -> Self {
        RouteVariant::ALL
            .into_iter()
            .fold(self, |provider, variant| {
                provider.with_route(variant, segments.to_vec())
            })
    }

    /// Fail `variant` with `error`.
    #[must_use]
    pub fn with_error(mut self, variant: RouteVariant, error: ProviderError) -> Self {
        self.responses.insert(variant, StubResponse::Error(error));
        self
    }

    /// Never answer `variant`.
    #[must_use]
    pub fn with_pending(mut self, variant: RouteVariant) -> Self {
        self.responses.insert(variant, StubResponse::Pending);
        self
    }

    /// Number of requests received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteProvider for StubRouteProvider {
    async fn fetch_route(&self, request: &RouteRequest) -> Result<Vec<RouteSegment>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(response) = self.responses.get(&request.variant) else {
            return Ok(Vec::new());
        };
        response.resolve().await
    }
}

/// Stub [`SurveillanceSource`] returning a fixed dataset.
#[derive(Debug)]
pub struct StubSurveillanceSource {
    response: StubResponse<Vec<FacilityPoint>>,
    calls: AtomicUsize,
}

impl StubSurveillanceSource {
    /// Return `points` on every call.
    #[must_use]
    pub fn with_points(points: Vec<FacilityPoint>) -> Self {
        Self::from_response(StubResponse::Value(points))
    }

    /// Fail every call with `error`.
    #[must_use]
    pub fn with_error(error: ProviderError) -> Self {
        Self::from_response(StubResponse::Error(error))
    }

    /// Never answer.
    #[must_use]
    pub fn pending() -> Self {
        Self::from_response(StubResponse::Pending)
    }

    const fn from_response(response: StubResponse<Vec<FacilityPoint>>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of dataset fetches.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StubSurveillanceSource {
    fn default() -> Self {
        Self::with_points(Vec::new())
    }
}

#[async_trait]
impl SurveillanceSource for StubSurveillanceSource {
    async fn fetch_surveillance(&self) -> Result<Vec<FacilityPoint>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.resolve().await
    }
}

/// Stub [`CommerceSource`] returning the same establishments for any centre.
#[derive(Debug)]
pub struct StubCommerceSource {
    response: StubResponse<Vec<FacilityPoint>>,
    calls: AtomicUsize,
    delay: Option<std::time::Duration>,
}

impl StubCommerceSource {
    /// Return `points` on every call.
    #[must_use]
    pub fn with_points(points: Vec<FacilityPoint>) -> Self {
        Self::from_response(StubResponse::Value(points))
    }

    /// Fail every call with `error`.
    #[must_use]
    pub fn with_error(error: ProviderError) -> Self {
        Self::from_response(StubResponse::Error(error))
    }

    /// Sleep for `delay` before answering.
    ///
    /// Uses the Tokio clock, so paused-time tests advance it explicitly.
    #[must_use]
    pub const fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    const fn from_response(response: StubResponse<Vec<FacilityPoint>>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Number of searches performed.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StubCommerceSource {
    fn default() -> Self {
        Self::with_points(Vec::new())
    }
}

#[async_trait]
impl CommerceSource for StubCommerceSource {
    async fn nearby_commerce(
        &self,
        _centre: Coord<f64>,
    ) -> Result<Vec<FacilityPoint>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.resolve().await
    }
}

/// Build a segment of `steps + 1` evenly spaced points from `from` to `to`.
///
/// Distance is the Haversine length and time assumes 1.25 m/s.
#[expect(
    clippy::float_arithmetic,
    reason = "intermediate points are linearly interpolated"
)]
#[must_use]
pub fn straight_segment(from: Coord<f64>, to: Coord<f64>, steps: u32) -> RouteSegment {
    let count = steps.max(1);
    let coordinates: Vec<_> = (0..=count)
        .map(|i| {
            let t = f64::from(i) / f64::from(count);
            Coord {
                x: from.x + (to.x - from.x) * t,
                y: from.y + (to.y - from.y) * t,
            }
        })
        .collect();
    let distance = crate::haversine_distance(from, to);
    RouteSegment::new(coordinates, distance, distance / 1.25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const A: Coord<f64> = Coord {
        x: 126.978,
        y: 37.566,
    };
    const B: Coord<f64> = Coord {
        x: 126.979,
        y: 37.567,
    };

    fn request(variant: RouteVariant) -> RouteRequest {
        RouteRequest {
            origin: A,
            destination: B,
            variant,
        }
    }

    #[rstest]
    fn straight_segment_includes_both_ends() {
        let segment = straight_segment(A, B, 4);
        assert_eq!(segment.coordinates.len(), 5);
        assert_eq!(segment.coordinates.first(), Some(&A));
        assert_eq!(segment.coordinates.last(), Some(&B));
    }

    #[rstest]
    #[tokio::test]
    async fn unconfigured_variants_have_no_segments() {
        let provider = StubRouteProvider::default()
            .with_route(RouteVariant::Shortest, vec![straight_segment(A, B, 1)]);
        let segments = provider
            .fetch_route(&request(RouteVariant::Recommended))
            .await
            .expect("stub succeeds");
        assert!(segments.is_empty());
        assert_eq!(provider.call_count(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn configured_errors_are_returned() {
        let error = ProviderError::Network {
            url: "http://router".into(),
            message: "refused".into(),
        };
        let provider =
            StubRouteProvider::default().with_error(RouteVariant::Shortest, error.clone());
        let result = provider.fetch_route(&request(RouteVariant::Shortest)).await;
        assert_eq!(result, Err(error));
    }
}
