//! Safety scoring for candidate walking routes.
//!
//! [`SafetyScorer`] turns a [`RoutePath`](saferoute_core::RoutePath) and the
//! surveillance dataset into a [`ScoredRoute`](saferoute_core::ScoredRoute):
//! the route is decimated, commerce establishments around its midpoint are
//! looked up through a shared [`StoreLookupCache`], and coverage is tallied
//! against both facility kinds before grading.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use saferoute_core::{CommerceSource, FacilityPoint, RoutePath};
//! use saferoute_scorer::{SafetyScorer, StoreCacheConfig, StoreLookupCache};
//!
//! async fn grade<C: CommerceSource>(
//!     commerce: C,
//!     route: &RoutePath,
//!     cameras: &[FacilityPoint],
//! ) -> Result<(), saferoute_core::SafeRouteError> {
//!     let cache = Arc::new(StoreLookupCache::new(StoreCacheConfig::default()));
//!     let scorer = SafetyScorer::new(commerce, cache);
//!     let scored = scorer.assess(route, cameras).await?;
//!     println!("grade {}", scored.safety.grade());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod cache;
mod scorer;

pub use cache::{
    CacheKey, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, StoreCacheConfig, StoreLookupCache,
};
pub use scorer::SafetyScorer;
