//! Site edge: host-based routing in front of the marketing site renderer.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod sitemap;

pub use config::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{HostRouter, RouteRequest, RoutingDecision};
