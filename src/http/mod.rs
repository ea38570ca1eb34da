//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign request ID)
//!     → middleware/host_routing.rs (redirect, block, rewrite or continue)
//!     → server.rs handlers (sitemaps, health) or upstream.rs (page renderer)
//!     → response.rs helpers shape edge-generated responses
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod upstream;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::OriginalPath;
pub use server::{AppState, HttpServer};
pub use upstream::{UpstreamClient, UpstreamError};
