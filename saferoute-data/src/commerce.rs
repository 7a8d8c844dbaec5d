//! HTTP adapter for the convenience-store category search.

use async_trait::async_trait;
use geo::Coord;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use saferoute_core::{CommerceDetails, CommerceSource, FacilityPoint, ProviderError};
use serde::Deserialize;
use url::Url;

use crate::http::{HttpProviderConfig, ProviderBuildError, convert_reqwest_error, read_json};

/// Default base URL of the local search API.
pub const DEFAULT_COMMERCE_BASE_URL: &str = "https://dapi.kakao.com";

/// Category code for convenience stores.
pub const CONVENIENCE_STORE_CATEGORY: &str = "CS2";

/// Configuration for [`HttpCommerceSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommerceSearchConfig {
    /// Base URL, REST key, timeout and user agent.
    pub http: HttpProviderConfig,
    /// Category group to search.
    pub category: String,
    /// Search radius in metres.
    pub radius_metres: u32,
    /// Maximum number of results per search.
    pub size: u32,
}

impl CommerceSearchConfig {
    /// Configure the default endpoint with `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_http(HttpProviderConfig::new(DEFAULT_COMMERCE_BASE_URL, api_key))
    }

    /// Wrap explicit connection settings.
    #[must_use]
    pub fn with_http(http: HttpProviderConfig) -> Self {
        Self {
            http,
            category: CONVENIENCE_STORE_CATEGORY.to_owned(),
            radius_metres: 1000,
            size: 15,
        }
    }

    /// Set the search radius.
    #[must_use]
    pub const fn with_radius(mut self, radius_metres: u32) -> Self {
        self.radius_metres = radius_metres;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    documents: Option<Vec<Document>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Document {
    place_name: String,
    x: String,
    y: String,
    road_address_name: String,
    address_name: String,
    distance: String,
}

impl Document {
    fn into_facility(self) -> Option<FacilityPoint> {
        let lon: f64 = self.x.trim().parse().ok()?;
        let lat: f64 = self.y.trim().parse().ok()?;
        let address = [self.road_address_name, self.address_name]
            .into_iter()
            .find(|candidate| !candidate.trim().is_empty());
        let details = CommerceDetails {
            name: self.place_name,
            address,
            distance_metres: self.distance.trim().parse().ok(),
        };
        FacilityPoint::commerce(Coord { x: lon, y: lat }, details).ok()
    }
}

fn convert_response(response: SearchResponse) -> Result<Vec<FacilityPoint>, ProviderError> {
    let documents = response.documents.ok_or_else(|| ProviderError::Parse {
        message: "commerce response has no documents array".to_owned(),
    })?;
    Ok(documents
        .into_iter()
        .filter_map(|document| {
            let name = document.place_name.clone();
            let point = document.into_facility();
            if point.is_none() {
                log::warn!("skipping commerce result {name:?}: invalid coordinates");
            }
            point
        })
        .collect())
}

/// Commerce source backed by the Kakao local category search.
#[derive(Debug)]
pub struct HttpCommerceSource {
    client: Client,
    config: CommerceSearchConfig,
    endpoint: Url,
    authorization: HeaderValue,
}

impl HttpCommerceSource {
    /// Create a source for the default endpoint.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be built or the key is
    /// not a valid header value.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(CommerceSearchConfig::new(api_key))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    /// Returns an error when the base URL is invalid, the HTTP client cannot
    /// be built or the key is not a valid header value.
    pub fn with_config(config: CommerceSearchConfig) -> Result<Self, ProviderBuildError> {
        let raw = format!(
            "{}/v2/local/search/category.json",
            config.http.trimmed_base_url()
        );
        let endpoint = Url::parse(&raw)
            .map_err(|source| ProviderBuildError::InvalidUrl { url: raw, source })?;
        let client = config.http.build_client()?;
        let authorization = config
            .http
            .credential_header("Authorization", Some("KakaoAK"))?;
        Ok(Self {
            client,
            config,
            endpoint,
            authorization,
        })
    }

    fn search_url(&self, centre: Coord<f64>) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("category_group_code", &self.config.category)
            .append_pair("x", &centre.x.to_string())
            .append_pair("y", &centre.y.to_string())
            .append_pair("radius", &self.config.radius_metres.to_string())
            .append_pair("size", &self.config.size.to_string());
        url
    }
}

#[async_trait]
impl CommerceSource for HttpCommerceSource {
    async fn nearby_commerce(
        &self,
        centre: Coord<f64>,
    ) -> Result<Vec<FacilityPoint>, ProviderError> {
        let url = self.search_url(centre);
        let target = url.to_string();
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.authorization.clone())
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &target, self.config.http.timeout))?;
        let parsed: SearchResponse = read_json(response, &target, self.config.http.timeout).await?;
        convert_response(parsed)
    }
}
