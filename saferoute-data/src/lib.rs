//! Provider adapters for the SafeRoute engine.
//!
//! This crate implements the outbound traits from `saferoute-core` against
//! real services:
//!
//! - [`HttpRouteProvider`] for the Tmap pedestrian route API,
//! - [`HttpSurveillanceSource`] for the public CCTV dataset, with
//!   [`FileSurveillanceSource`] reading a local export instead,
//! - [`HttpCommerceSource`] for the Kakao convenience-store search.
//!
//! Transport failures are mapped onto
//! [`ProviderError`](saferoute_core::ProviderError) so the engine never sees
//! `reqwest` types.

#![forbid(unsafe_code)]

mod commerce;
mod file;
mod http;
mod records;
pub mod routing;
mod surveillance;

pub use commerce::{
    CONVENIENCE_STORE_CATEGORY, CommerceSearchConfig, DEFAULT_COMMERCE_BASE_URL,
    HttpCommerceSource,
};
pub use file::FileSurveillanceSource;
pub use http::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpProviderConfig, ProviderBuildError};
pub use records::{SurveillancePage, SurveillanceRecord, collect_surveillance};
pub use routing::{DEFAULT_ROUTING_BASE_URL, HttpRouteProvider};
pub use surveillance::{
    DEFAULT_PAGE_SIZE, DEFAULT_SURVEILLANCE_URL, HttpSurveillanceSource, SurveillanceSourceConfig,
};
