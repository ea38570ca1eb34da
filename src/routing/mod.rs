//! Host-based routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (scheme, Host header, path, query)
//!     → request.rs (RouteRequest: lower-cased host, non-empty segments)
//!     → subdomain.rs (extract subdomain, classify root / state / city)
//!     → router.rs (ordered guards over catalog.rs constants)
//!     → Return: RoutingDecision (pass-through, redirect, rewrite, block)
//! ```
//!
//! # Design Decisions
//! - Constants compiled in, never reloaded
//! - Deterministic: same input always yields the same decision
//! - First match wins

pub mod catalog;
pub mod decision;
pub mod request;
pub mod router;
pub mod subdomain;

pub use decision::{Location, RoutingDecision};
pub use request::{RouteRequest, Scheme};
pub use router::HostRouter;
pub use subdomain::HostKind;
