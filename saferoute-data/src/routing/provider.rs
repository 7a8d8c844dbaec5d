//! HTTP-based [`RouteProvider`] for the pedestrian route API.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderValue;
use saferoute_core::{ProviderError, RouteProvider, RouteRequest, RouteSegment};

use super::tmap::{PedestrianRouteRequest, RouteResponse};
use crate::http::{HttpProviderConfig, ProviderBuildError, convert_reqwest_error, read_json};

/// Default base URL of the pedestrian route API.
pub const DEFAULT_ROUTING_BASE_URL: &str = "https://apis.openapi.sk.com";

/// Header carrying the routing API key.
const APP_KEY_HEADER: &str = "appKey";

/// Pedestrian route provider backed by the Tmap HTTP API.
///
/// One `POST` is issued per [`RouteRequest`]; the variant selects the
/// provider's `searchOption`.
///
/// # Examples
/// ```no_run
/// use geo::Coord;
/// use saferoute_core::{RouteProvider, RouteRequest, RouteVariant};
/// use saferoute_data::{HttpProviderConfig, HttpRouteProvider};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = HttpRouteProvider::with_config(HttpProviderConfig::new(
///     "https://apis.openapi.sk.com",
///     "app-key",
/// ))?;
/// let segments = provider
///     .fetch_route(&RouteRequest {
///         origin: Coord { x: 126.9780, y: 37.5665 },
///         destination: Coord { x: 126.9920, y: 37.5700 },
///         variant: RouteVariant::Recommended,
///     })
///     .await?;
/// # let _ = segments;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpRouteProvider {
    client: Client,
    config: HttpProviderConfig,
    app_key: HeaderValue,
}

impl HttpRouteProvider {
    /// Create a provider for the default endpoint using `api_key`.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be built or the key is
    /// not a valid header value.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(DEFAULT_ROUTING_BASE_URL, api_key))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be built or the key is
    /// not a valid header value.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        let app_key = config.credential_header(APP_KEY_HEADER, None)?;
        Ok(Self {
            client,
            config,
            app_key,
        })
    }

    fn route_url(&self) -> String {
        format!(
            "{}/tmap/routes/pedestrian?version=1",
            self.config.trimmed_base_url()
        )
    }
}

#[async_trait]
impl RouteProvider for HttpRouteProvider {
    async fn fetch_route(&self, request: &RouteRequest) -> Result<Vec<RouteSegment>, ProviderError> {
        let url = self.route_url();
        let body = PedestrianRouteRequest::new(request.origin, request.destination, request.variant);
        log::debug!("requesting {} route from {url}", request.variant);

        let response = self
            .client
            .post(&url)
            .header(APP_KEY_HEADER, self.app_key.clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.timeout))?;
        let parsed: RouteResponse = read_json(response, &url, self.config.timeout).await?;
        parsed.into_segments()
    }
}
