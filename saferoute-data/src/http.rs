//! Shared HTTP plumbing for the provider adapters.

use std::time::Duration;

use reqwest::header::{HeaderValue, InvalidHeaderValue};
use reqwest::{Client, Response};
use saferoute_core::ProviderError;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "saferoute/0.1";

/// Default connect and request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while constructing an HTTP adapter.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL could not be parsed.
    #[error("invalid provider URL {url:?}: {source}")]
    InvalidUrl {
        /// Rejected URL.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The API key cannot be sent as a header value.
    #[error("API key is not a valid {header} header value")]
    InvalidApiKey {
        /// Header the key was destined for.
        header: &'static str,
        /// Header validation failure.
        #[source]
        source: InvalidHeaderValue,
    },
}

/// Connection settings shared by every HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProviderConfig {
    /// Base URL of the service, or the full endpoint for dataset providers.
    pub base_url: String,
    /// Credential sent with every request.
    pub api_key: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpProviderConfig {
    /// Create a configuration for `base_url` authenticated with `api_key`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the connect and request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL without trailing slashes.
    pub(crate) fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub(crate) fn build_client(&self) -> Result<Client, ProviderBuildError> {
        Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)
    }

    /// Build a sensitive header value carrying the API key.
    pub(crate) fn credential_header(
        &self,
        header: &'static str,
        scheme: Option<&str>,
    ) -> Result<HeaderValue, ProviderBuildError> {
        let raw = scheme.map_or_else(
            || self.api_key.clone(),
            |prefix| format!("{prefix} {}", self.api_key),
        );
        let mut value = HeaderValue::from_str(&raw)
            .map_err(|source| ProviderBuildError::InvalidApiKey { header, source })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Map a `reqwest` failure onto the provider error model.
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout: Duration,
) -> ProviderError {
    if error.is_timeout() {
        return ProviderError::Timeout {
            target: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return ProviderError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    if error.is_decode() {
        return ProviderError::Parse {
            message: error.to_string(),
        };
    }

    ProviderError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Reject non-success statuses and decode the JSON body.
///
/// Error messages name `url` rather than the request URL, which may carry a
/// credential in its query string.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    url: &str,
    timeout: Duration,
) -> Result<T, ProviderError> {
    let checked = response
        .error_for_status()
        .map_err(|err| convert_reqwest_error(&err.without_url(), url, timeout))?;
    let body = checked
        .bytes()
        .await
        .map_err(|err| convert_reqwest_error(&err.without_url(), url, timeout))?;
    serde_json::from_slice(&body).map_err(|err| ProviderError::Parse {
        message: err.to_string(),
    })
}
