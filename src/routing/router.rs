//! Host-based routing decision table.
//!
//! # Responsibilities
//! - Canonicalize the bare root domain onto `www`
//! - Map state and city subdomains onto their internal page trees
//! - Migrate legacy `/states/..` URLs to state subdomains
//! - Block duplicate-content and internal paths on subdomains
//!
//! # Design Decisions
//! - Pure function of (host, path, query): no I/O, no shared mutable state
//! - Ordered guards, first match wins, no backtracking
//! - Always total: malformed hosts degrade to an empty subdomain and pass through

use crate::routing::catalog::{self, ROOT_DOMAIN, SECTIONS};
use crate::routing::decision::{Location, RoutingDecision};
use crate::routing::request::{RouteRequest, Scheme};
use crate::routing::subdomain::{self, HostKind};

/// Trailing path segments stripped from malformed crawled URLs.
const JUNK_SEGMENTS: [&str; 2] = ["$", "&"];

/// Top-level paths that subdomains never serve.
const BLOCKED_TOP_LEVEL: [&str; 2] = ["api", "robots.txt"];

/// Prefix of service detail pages that only exist on the main site.
const SERVICE_DETAIL_PREFIX: &str = "plumber-";

/// Immutable host router. Cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct HostRouter {
    root_domain: String,
}

impl Default for HostRouter {
    fn default() -> Self {
        Self::new(ROOT_DOMAIN)
    }
}

impl HostRouter {
    pub fn new(root_domain: impl Into<String>) -> Self {
        Self {
            root_domain: root_domain.into().to_ascii_lowercase(),
        }
    }

    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Classifies a host into root, state or city.
    pub fn classify(&self, host: &str) -> HostKind {
        subdomain::classify(host, &self.root_domain)
    }

    /// Produces the routing decision for a request.
    pub fn route(&self, req: &RouteRequest) -> RoutingDecision {
        let root = self.root_domain.as_str();
        let segments = req.segments();

        if req.hostname() == root {
            return RoutingDecision::permanent_redirect(Location::new(
                Scheme::Https,
                format!("www.{root}"),
                req.raw_path_and_query(),
            ));
        }

        let sub = subdomain::extract_subdomain(req.hostname(), root);
        let is_state = catalog::is_state_code(&sub);

        if subdomain::is_main_site(&sub, root) && req.segment(0) == Some("states") {
            if let Some(code) = req.segment(1) {
                return RoutingDecision::permanent_redirect(state_home(code, root));
            }
        }

        if subdomain::is_root_like(&sub, root) {
            return RoutingDecision::PassThrough;
        }

        let base = if is_state {
            format!("/states/{sub}")
        } else {
            format!("/locations/{sub}")
        };

        if segments.is_empty() {
            return RoutingDecision::rewrite(base);
        }

        if let [section] = segments {
            if SECTIONS.contains(&section.as_str()) {
                return RoutingDecision::rewrite(format!("{base}/{section}"));
            }
        }

        if segments.last().is_some_and(|s| is_junk(s)) {
            let kept = segments
                .iter()
                .rposition(|s| !is_junk(s))
                .map_or(0, |i| i + 1);
            let cleaned = format!("/{}", segments[..kept].join("/"));
            return RoutingDecision::permanent_redirect(same_host(req, cleaned));
        }

        if req.segment(0) == Some("states") {
            let location = match req.segment(1) {
                Some(code) if code.to_ascii_lowercase() != sub => state_home(code, root),
                _ => same_host(req, "/"),
            };
            return RoutingDecision::permanent_redirect(location);
        }

        // Repeats the section rewrite above for `/services`.
        if let [only] = segments {
            if only == "services" {
                return RoutingDecision::rewrite(format!("{base}/services"));
            }
        }

        if let [first, detail] = segments {
            if first == "services" && detail.starts_with(SERVICE_DETAIL_PREFIX) {
                return RoutingDecision::not_found();
            }
        }

        if let [slug] = segments {
            if catalog::is_service_slug(slug) {
                return RoutingDecision::rewrite(format!("{base}/{}", slug.to_ascii_lowercase()));
            }
        }

        if req
            .segment(0)
            .is_some_and(|first| BLOCKED_TOP_LEVEL.contains(&first))
        {
            return RoutingDecision::not_found();
        }

        RoutingDecision::PassThrough
    }
}

fn is_junk(segment: &str) -> bool {
    JUNK_SEGMENTS.contains(&segment)
}

fn state_home(code: &str, root: &str) -> Location {
    Location::new(
        Scheme::Https,
        format!("{}.{root}", code.to_ascii_lowercase()),
        "/",
    )
}

fn same_host(req: &RouteRequest, path: impl Into<String>) -> Location {
    Location::new(req.scheme(), req.authority(), path)
}
