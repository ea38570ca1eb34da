//! Compiled-in site constants.
//!
//! The root domain, the recognized state codes and the service offering slugs
//! are fixed at build time. Lookups lower-case their input first.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Registrable domain serving the main marketing site.
pub const ROOT_DOMAIN: &str = "unitedplumbingcctx.com";

/// Section pages available on every subdomain.
pub const SECTIONS: [&str; 3] = ["services", "about", "contact"];

const STATE_CODE_LIST: [&str; 50] = [
    "al", "ak", "az", "ar", "ca", "co", "ct", "de", "fl", "ga",
    "hi", "id", "il", "in", "ia", "ks", "ky", "la", "me", "md",
    "ma", "mi", "mn", "ms", "mo", "mt", "ne", "nv", "nh", "nj",
    "nm", "ny", "nc", "nd", "oh", "ok", "or", "pa", "ri", "sc",
    "sd", "tn", "tx", "ut", "vt", "va", "wa", "wv", "wi", "wy",
];

/// Service offering slugs, in the order they are listed on the site.
pub const SERVICE_SLUG_LIST: [&str; 18] = [
    "plumber-drain-cleaning",
    "plumber-toilet-repair",
    "plumber-leak-detection",
    "plumber-water-heater-repair",
    "plumber-water-heater-installation",
    "plumber-tankless-water-heater",
    "plumber-sewer-line-repair",
    "plumber-emergency-plumbing",
    "plumber-garbage-disposal-repair",
    "plumber-faucet-repair",
    "plumber-pipe-repair",
    "plumber-slab-leak-repair",
    "plumber-gas-line-repair",
    "plumber-hydro-jetting",
    "plumber-repiping",
    "plumber-sump-pump-repair",
    "plumber-water-softener-installation",
    "plumber-backflow-testing",
];

static STATE_CODES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STATE_CODE_LIST.into_iter().collect());

static SERVICE_SLUGS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| SERVICE_SLUG_LIST.into_iter().collect());

/// Returns true if `code` is a recognized two-letter state code.
pub fn is_state_code(code: &str) -> bool {
    STATE_CODES.contains(code.to_ascii_lowercase().as_str())
}

/// Returns true if `slug` names a service offering.
pub fn is_service_slug(slug: &str) -> bool {
    SERVICE_SLUGS.contains(slug.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_lookup_is_case_insensitive() {
        assert!(is_state_code("tx"));
        assert!(is_state_code("TX"));
        assert!(is_state_code("Wy"));
        assert!(!is_state_code("pr"));
        assert!(!is_state_code("dc"));
        assert!(!is_state_code("austin"));
        assert!(!is_state_code(""));
    }

    #[test]
    fn test_service_slug_lookup() {
        assert!(is_service_slug("plumber-toilet-repair"));
        assert!(is_service_slug("PLUMBER-Toilet-Repair"));
        assert!(!is_service_slug("toilet-repair"));
        assert!(!is_service_slug("services"));
    }

    #[test]
    fn test_lists_have_no_duplicates() {
        assert_eq!(STATE_CODES.len(), STATE_CODE_LIST.len());
        assert_eq!(SERVICE_SLUGS.len(), SERVICE_SLUG_LIST.len());
        assert!(SERVICE_SLUG_LIST.iter().all(|s| s.starts_with("plumber-")));
    }
}
