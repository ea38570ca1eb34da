//! Routing decision returned by the host router.

use axum::http::StatusCode;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::routing::request::Scheme;

/// Absolute redirect target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub scheme: Scheme,
    /// Target host, including a port when redirecting to the same host.
    pub host: String,
    /// Target path, with query when one is preserved.
    pub path: String,
}

impl Location {
    pub fn new(scheme: Scheme, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)
    }
}

/// Exactly one of these is produced per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RoutingDecision {
    /// Continue to normal page resolution unmodified.
    PassThrough,
    /// Send the client elsewhere.
    Redirect {
        location: Location,
        #[serde(serialize_with = "serialize_status")]
        status: StatusCode,
    },
    /// Serve a different internal path; the client-visible URL is unchanged.
    Rewrite { target_path: String },
    /// Refuse with a plain response.
    Block {
        #[serde(serialize_with = "serialize_status")]
        status: StatusCode,
    },
}

impl RoutingDecision {
    pub fn permanent_redirect(location: Location) -> Self {
        RoutingDecision::Redirect {
            location,
            status: StatusCode::MOVED_PERMANENTLY,
        }
    }

    pub fn rewrite(target_path: impl Into<String>) -> Self {
        RoutingDecision::Rewrite {
            target_path: target_path.into(),
        }
    }

    pub fn not_found() -> Self {
        RoutingDecision::Block {
            status: StatusCode::NOT_FOUND,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingDecision::PassThrough => "pass_through",
            RoutingDecision::Redirect { .. } => "redirect",
            RoutingDecision::Rewrite { .. } => "rewrite",
            RoutingDecision::Block { .. } => "block",
        }
    }
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = Location::new(Scheme::Https, "tx.example.com", "/");
        assert_eq!(loc.to_string(), "https://tx.example.com/");

        let loc = Location::new(Scheme::Http, "austin.localhost:3000", "/about?x=1");
        assert_eq!(loc.to_string(), "http://austin.localhost:3000/about?x=1");
    }

    #[test]
    fn test_serialize_decision() {
        let decision = RoutingDecision::permanent_redirect(Location::new(
            Scheme::Https,
            "www.example.com",
            "/about",
        ));
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["action"], "redirect");
        assert_eq!(json["status"], 301);
        assert_eq!(json["location"]["scheme"], "https");
        assert_eq!(json["location"]["host"], "www.example.com");

        let json = serde_json::to_value(RoutingDecision::not_found()).unwrap();
        assert_eq!(json, serde_json::json!({ "action": "block", "status": 404 }));

        let json = serde_json::to_value(RoutingDecision::PassThrough).unwrap();
        assert_eq!(json, serde_json::json!({ "action": "pass_through" }));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(RoutingDecision::PassThrough.kind(), "pass_through");
        assert_eq!(RoutingDecision::rewrite("/states/tx").kind(), "rewrite");
        assert_eq!(RoutingDecision::not_found().kind(), "block");
    }
}
