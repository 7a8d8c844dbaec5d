//! Error types shared by the engine and its providers.

use thiserror::Error;

use crate::{CoordinateError, RouteError, RouteVariant};

/// Failure reported by an outbound provider.
///
/// Adapters map their transport errors into this type so the engine can wrap
/// them without depending on a particular HTTP stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request did not complete in time.
    #[error("request to {target} timed out after {timeout_secs}s")]
    Timeout {
        /// URL or logical name of the timed-out request.
        target: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },
    /// The provider answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error reaching {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// The provider answered with an application-level error.
    #[error("provider returned error {code}: {message}")]
    Service {
        /// Provider error code.
        code: String,
        /// Provider error message.
        message: String,
    },
    /// A local dataset could not be read.
    #[error("failed to read {path}: {message}")]
    Io {
        /// Path of the dataset file.
        path: String,
        /// I/O error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse provider response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}

/// Outbound collaborator a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Pedestrian routing provider.
    Routing,
    /// Surveillance dataset provider.
    Surveillance,
    /// Commerce search provider.
    Commerce,
}

impl ProviderKind {
    /// Return the kind as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Routing => "routing",
            Self::Surveillance => "surveillance",
            Self::Commerce => "commerce",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the route engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SafeRouteError {
    /// A single candidate route was unusable.
    ///
    /// The engine excludes such candidates rather than failing; this variant
    /// only escapes when a caller asks for one specific route.
    #[error("{variant} route is invalid: {reason}")]
    RouteInvalid {
        /// Variant that produced the route.
        variant: RouteVariant,
        /// Why the route was rejected.
        #[source]
        reason: RouteError,
    },
    /// No candidate route survived validation.
    #[error("no valid route between the requested points")]
    NoValidRoute,
    /// An outbound provider failed.
    #[error("{provider} provider unavailable: {source}")]
    ProviderUnavailable {
        /// Which provider failed.
        provider: ProviderKind,
        /// Upstream failure.
        #[source]
        source: ProviderError,
    },
    /// A dataset payload was malformed.
    #[error("{dataset} dataset could not be parsed: {message}")]
    DatasetParse {
        /// Dataset that failed to parse.
        dataset: ProviderKind,
        /// Decoder error description.
        message: String,
    },
    /// The caller supplied an unusable coordinate.
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordinateError),
}

impl SafeRouteError {
    /// Wrap a failure from a dataset provider.
    ///
    /// Decoding failures become [`SafeRouteError::DatasetParse`]; every other
    /// failure means the dataset was unreachable.
    #[must_use]
    pub fn from_dataset(dataset: ProviderKind, error: ProviderError) -> Self {
        match error {
            ProviderError::Parse { message } => Self::DatasetParse { dataset, message },
            source => Self::ProviderUnavailable {
                provider: dataset,
                source,
            },
        }
    }

    /// Wrap a failure from the routing provider.
    ///
    /// An undecodable routing response is treated like any other outage.
    #[must_use]
    pub const fn from_routing(error: ProviderError) -> Self {
        Self::ProviderUnavailable {
            provider: ProviderKind::Routing,
            source: error,
        }
    }
}
