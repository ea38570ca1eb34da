//! Routing-relevant view of an incoming request.

use axum::http::{header, Request};
use serde::Serialize;
use std::fmt;

/// URL scheme of the request as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Parses `http` / `https`, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Some(Scheme::Http),
            "https" => Some(Scheme::Https),
            _ => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable, request-scoped input to the host router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    scheme: Scheme,
    /// Host header value, lower-cased, port included.
    authority: String,
    segments: Vec<String>,
    query: Option<String>,
    /// Path and query exactly as received.
    raw_path_and_query: String,
}

impl RouteRequest {
    /// Build from a scheme, a Host header value and a path with optional query.
    pub fn new(scheme: Scheme, host: &str, path_and_query: &str) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((p, q)) => (p, Some(q.to_string())),
            None => (path_and_query, None),
        };

        Self {
            scheme,
            authority: host.trim().to_ascii_lowercase(),
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: query.filter(|q| !q.is_empty()),
            raw_path_and_query: if path_and_query.starts_with('/') {
                path_and_query.to_string()
            } else {
                format!("/{path_and_query}")
            },
        }
    }

    /// Build from an HTTP request. The scheme comes from `x-forwarded-proto`
    /// when present, otherwise `default_scheme`.
    pub fn from_http<B>(req: &Request<B>, default_scheme: Scheme) -> Self {
        let headers = req.headers();
        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| req.uri().authority().map(|a| a.as_str()))
            .unwrap_or("");
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok())
            .and_then(Scheme::parse)
            .unwrap_or(default_scheme);
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        Self::new(scheme, host, path_and_query)
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host header as received (lower-cased), including any port.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Host without port.
    pub fn hostname(&self) -> &str {
        strip_port(&self.authority)
    }

    /// Non-empty path segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Normalized path (`/` joined segments).
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Path and query as received, for redirects that must not alter the URL.
    pub fn raw_path_and_query(&self) -> &str {
        &self.raw_path_and_query
    }

    /// Normalized path followed by `?query` when a query is present.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path(), q),
            None => self.path(),
        }
    }
}

/// Removes a trailing `:port` from a host, leaving bracketed IPv6 intact.
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_segments_discard_empty() {
        let req = RouteRequest::new(Scheme::Https, "Austin.Example.com", "//services///about/?a=1");
        assert_eq!(req.segments(), ["services", "about"]);
        assert_eq!(req.authority(), "austin.example.com");
        assert_eq!(req.query(), Some("a=1"));
        assert_eq!(req.path(), "/services/about");
        assert_eq!(req.path_and_query(), "/services/about?a=1");
        assert_eq!(req.raw_path_and_query(), "//services///about/?a=1");
    }

    #[test]
    fn test_root_path() {
        let req = RouteRequest::new(Scheme::Http, "example.com", "/");
        assert!(req.segments().is_empty());
        assert_eq!(req.path(), "/");
        assert_eq!(req.query(), None);

        let req = RouteRequest::new(Scheme::Http, "example.com", "/?");
        assert_eq!(req.query(), None);
        assert_eq!(req.raw_path_and_query(), "/?");

        let req = RouteRequest::new(Scheme::Http, "example.com", "");
        assert_eq!(req.raw_path_and_query(), "/");
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("austin.localhost:3000"), "austin.localhost");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
    }

    #[test]
    fn test_from_http_uses_forwarded_proto() {
        let req = Request::builder()
            .uri("/about?x=y")
            .header("Host", "tx.example.com")
            .header("X-Forwarded-Proto", "http")
            .body(Body::empty())
            .unwrap();

        let route_req = RouteRequest::from_http(&req, Scheme::Https);
        assert_eq!(route_req.scheme(), Scheme::Http);
        assert_eq!(route_req.authority(), "tx.example.com");
        assert_eq!(route_req.path_and_query(), "/about?x=y");
    }

    #[test]
    fn test_from_http_without_host() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let route_req = RouteRequest::from_http(&req, Scheme::Https);
        assert_eq!(route_req.authority(), "");
        assert_eq!(route_req.scheme(), Scheme::Https);
    }
}
