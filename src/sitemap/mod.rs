//! Sitemap subsystem.
//!
//! # Data Flow
//! ```text
//! GET /sitemap.xml | /sitemap-pages.xml
//!     → classify host (root / state / city)
//!     → generator.rs (pick pages for that host from the location dataset)
//!     → xml.rs (render urlset or sitemapindex)
//! ```

pub mod generator;
pub mod xml;

pub use generator::{SitemapError, SitemapFile, SitemapGenerator};
