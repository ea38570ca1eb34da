//! Subdomain extraction and host classification.
//!
//! Both functions depend on the host alone, never on path or method.

use serde::Serialize;

use crate::routing::catalog;
use crate::routing::request::strip_port;

/// What kind of site a host serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum HostKind {
    /// Main marketing site (bare root, `www`, site name, local host).
    Root,
    /// State aggregation site; holds the lower-case state code.
    State(String),
    /// Per-location site; holds the lower-case subdomain.
    City(String),
}

/// Extracts the subdomain of `host` relative to `root_domain`.
///
/// Returns an empty string for the bare root domain, for hosts outside the
/// root domain, and for local hosts without a dot-separated prefix.
pub fn extract_subdomain(host: &str, root_domain: &str) -> String {
    let host = strip_port(host.trim()).to_ascii_lowercase();

    if let Some(prefix) = host
        .strip_suffix(root_domain)
        .and_then(|rest| rest.strip_suffix('.'))
    {
        return prefix.to_string();
    }

    if host.contains("localhost") {
        if let Some((label, _)) = host.split_once('.') {
            return label.to_string();
        }
    }

    String::new()
}

/// Subdomains naming the main site: none, `www`, or the bare site name (the
/// root domain's first label).
pub fn is_main_site(subdomain: &str, root_domain: &str) -> bool {
    matches!(subdomain, "" | "www") || subdomain == site_name(root_domain)
}

/// Main-site subdomains plus the `localhost` development label.
pub fn is_root_like(subdomain: &str, root_domain: &str) -> bool {
    is_main_site(subdomain, root_domain) || subdomain == "localhost"
}

/// First label of the root domain.
pub fn site_name(root_domain: &str) -> &str {
    root_domain.split('.').next().unwrap_or(root_domain)
}

/// Classifies `host` into root, state or city.
pub fn classify(host: &str, root_domain: &str) -> HostKind {
    let subdomain = extract_subdomain(host, root_domain);
    if is_root_like(&subdomain, root_domain) {
        HostKind::Root
    } else if catalog::is_state_code(&subdomain) {
        HostKind::State(subdomain)
    } else {
        HostKind::City(subdomain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "unitedplumbingcctx.com";

    #[test]
    fn test_extract_subdomain() {
        assert_eq!(extract_subdomain("austin.unitedplumbingcctx.com", ROOT), "austin");
        assert_eq!(extract_subdomain("TX.UnitedPlumbingCCTX.com", ROOT), "tx");
        assert_eq!(extract_subdomain("www.unitedplumbingcctx.com:443", ROOT), "www");
        assert_eq!(extract_subdomain("unitedplumbingcctx.com", ROOT), "");
        assert_eq!(extract_subdomain("evilunitedplumbingcctx.com", ROOT), "");
        assert_eq!(extract_subdomain("example.org", ROOT), "");
        assert_eq!(extract_subdomain("", ROOT), "");
    }

    #[test]
    fn test_extract_localhost() {
        assert_eq!(extract_subdomain("austin.localhost:3000", ROOT), "austin");
        assert_eq!(extract_subdomain("localhost:3000", ROOT), "");
        assert_eq!(extract_subdomain("localhost", ROOT), "");
    }

    #[test]
    fn test_root_like() {
        assert_eq!(site_name(ROOT), "unitedplumbingcctx");
        assert!(is_root_like("", ROOT));
        assert!(is_root_like("www", ROOT));
        assert!(is_root_like("localhost", ROOT));
        assert!(!is_main_site("localhost", ROOT));
        assert!(is_main_site("unitedplumbingcctx", ROOT));
        assert!(is_root_like("unitedplumbingcctx", ROOT));
        assert!(!is_root_like("austin", ROOT));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("unitedplumbingcctx.com", ROOT), HostKind::Root);
        assert_eq!(classify("www.unitedplumbingcctx.com", ROOT), HostKind::Root);
        assert_eq!(classify("unitedplumbingcctx.localhost", ROOT), HostKind::Root);
        assert_eq!(classify("localhost:3000", ROOT), HostKind::Root);
        assert_eq!(classify("tx.unitedplumbingcctx.com", ROOT), HostKind::State("tx".into()));
        assert_eq!(classify("austin.unitedplumbingcctx.com", ROOT), HostKind::City("austin".into()));
        assert_eq!(classify("ca.localhost:3000", ROOT), HostKind::State("ca".into()));
    }
}
