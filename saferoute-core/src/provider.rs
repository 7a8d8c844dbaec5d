//! Outbound collaborators consumed by the engine.
//!
//! Each trait describes one external dependency: the pedestrian router, the
//! surveillance dataset and the commerce search. Implementations live in
//! `saferoute-data` (HTTP and file adapters) and in [`crate::test_support`].

use std::sync::Arc;

use async_trait::async_trait;
use geo::Coord;

use crate::{FacilityPoint, ProviderError, RouteSegment, RouteVariant};

/// One routing request for a single variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Validated start coordinate.
    pub origin: Coord<f64>,
    /// Validated end coordinate.
    pub destination: Coord<f64>,
    /// Path-finding strategy to request.
    pub variant: RouteVariant,
}

/// Fetch walking-route geometry from a pedestrian router.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Return the provider's segments for `request`, in travel order.
    ///
    /// An empty list is not an error at this layer; the engine rejects routes
    /// without geometry itself.
    async fn fetch_route(&self, request: &RouteRequest) -> Result<Vec<RouteSegment>, ProviderError>;
}

/// Fetch the surveillance dataset.
#[async_trait]
pub trait SurveillanceSource: Send + Sync {
    /// Return every surveillance point in the dataset.
    async fn fetch_surveillance(&self) -> Result<Vec<FacilityPoint>, ProviderError>;
}

/// Search commerce establishments around a coordinate.
#[async_trait]
pub trait CommerceSource: Send + Sync {
    /// Return establishments near `centre`.
    async fn nearby_commerce(&self, centre: Coord<f64>)
    -> Result<Vec<FacilityPoint>, ProviderError>;
}

#[async_trait]
impl<T: RouteProvider + ?Sized> RouteProvider for Arc<T> {
    async fn fetch_route(&self, request: &RouteRequest) -> Result<Vec<RouteSegment>, ProviderError> {
        (**self).fetch_route(request).await
    }
}

#[async_trait]
impl<T: SurveillanceSource + ?Sized> SurveillanceSource for Arc<T> {
    async fn fetch_surveillance(&self) -> Result<Vec<FacilityPoint>, ProviderError> {
        (**self).fetch_surveillance().await
    }
}

#[async_trait]
impl<T: CommerceSource + ?Sized> CommerceSource for Arc<T> {
    async fn nearby_commerce(
        &self,
        centre: Coord<f64>,
    ) -> Result<Vec<FacilityPoint>, ProviderError> {
        (**self).nearby_commerce(centre).await
    }
}
