//! Route planning for the SafeRoute engine.
//!
//! [`RoutingClient`] requests the candidate walking routes for an
//! origin/destination pair. [`SafeRouteEngine`] ties it to the safety scorer
//! and route selector and exposes the two public operations:
//! [`SafeRouteEngine::compute_shortest_route`] and
//! [`SafeRouteEngine::compute_safest_route`].
//!
//! Every operation either returns a complete result or a typed
//! [`SafeRouteError`](saferoute_core::SafeRouteError); partial results are
//! never returned.

#![forbid(unsafe_code)]

mod engine;
mod routing;

pub use engine::{EngineConfig, SafeRouteEngine, SafestRoute};
pub use routing::{DEFAULT_REQUEST_TIMEOUT, RoutingClient};
