//! Server module for building the delivery HTTP service
//!
//! `ServerBuilder` collects the order store, mirror and log sinks, builds a
//! transport-agnostic `ServerHost`, and exposes it over REST.

pub mod builder;
pub mod exposure;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use host::ServerHost;
pub use router::build_order_routes;
