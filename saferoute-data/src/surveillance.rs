//! HTTP adapter for the public CCTV dataset.

use async_trait::async_trait;
use reqwest::Client;
use saferoute_core::{FacilityPoint, ProviderError, SurveillanceSource};
use url::Url;

use crate::http::{HttpProviderConfig, ProviderBuildError, convert_reqwest_error, read_json};
use crate::records::{SurveillancePage, SurveillanceRecord, collect_surveillance};

/// Default endpoint of the surveillance dataset.
pub const DEFAULT_SURVEILLANCE_URL: &str =
    "https://api.odcloud.kr/api/15083776/v1/uddi:c311f3b0-6de3-4269-b4b3-bd3ea8eedbff";

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Configuration for [`HttpSurveillanceSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveillanceSourceConfig {
    /// Endpoint, service key, timeout and user agent.
    ///
    /// `base_url` is the full dataset endpoint.
    pub http: HttpProviderConfig,
    /// Records requested per page.
    pub page_size: u32,
    /// Maximum number of pages fetched per call; at least one.
    pub max_pages: u32,
}

impl SurveillanceSourceConfig {
    /// Configure the default endpoint with `service_key`.
    #[must_use]
    pub fn new(service_key: impl Into<String>) -> Self {
        Self::with_http(HttpProviderConfig::new(
            DEFAULT_SURVEILLANCE_URL,
            service_key,
        ))
    }

    /// Wrap explicit connection settings.
    #[must_use]
    pub const fn with_http(http: HttpProviderConfig) -> Self {
        Self {
            http,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: 1,
        }
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the page limit.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// Surveillance dataset fetched over HTTP.
///
/// Pages are requested in order until one comes back short, the reported
/// total is reached, or `max_pages` pages have been read.
#[derive(Debug)]
pub struct HttpSurveillanceSource {
    client: Client,
    config: SurveillanceSourceConfig,
    endpoint: Url,
}

impl HttpSurveillanceSource {
    /// Create a source for the default endpoint.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(service_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(SurveillanceSourceConfig::new(service_key))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    /// Returns an error when the endpoint is not a valid URL or the HTTP
    /// client cannot be built.
    pub fn with_config(config: SurveillanceSourceConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = Url::parse(&config.http.base_url).map_err(|source| {
            ProviderBuildError::InvalidUrl {
                url: config.http.base_url.clone(),
                source,
            }
        })?;
        let client = config.http.build_client()?;
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    fn page_url(&self, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("perPage", &self.config.page_size.to_string())
            .append_pair("serviceKey", &self.config.http.api_key)
            .append_pair("returnType", "JSON");
        url
    }

    async fn fetch_page(&self, page: u32) -> Result<SurveillancePage, ProviderError> {
        let url = self.page_url(page);
        // The service key travels in the query string; keep it out of errors.
        let target = self.endpoint.as_str();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| {
                convert_reqwest_error(&err.without_url(), target, self.config.http.timeout)
            })?;
        read_json(response, target, self.config.http.timeout).await
    }
}

#[async_trait]
impl SurveillanceSource for HttpSurveillanceSource {
    async fn fetch_surveillance(&self) -> Result<Vec<FacilityPoint>, ProviderError> {
        let mut records: Vec<SurveillanceRecord> = Vec::new();
        for page in 1..=self.config.max_pages.max(1) {
            let fetched = self.fetch_page(page).await?;
            let total = fetched.total_count;
            let rows = fetched.into_records()?;
            let short_page =
                rows.len() < usize::try_from(self.config.page_size).unwrap_or(usize::MAX);
            records.extend(rows);
            let complete = total
                .is_some_and(|count| u64::try_from(records.len()).unwrap_or(u64::MAX) >= count);
            if short_page || complete {
                break;
            }
        }
        log::debug!("fetched {} surveillance records", records.len());
        Ok(collect_surveillance(records))
    }
}
