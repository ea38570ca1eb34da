//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges (timeouts > 0, body limit > 0)
//! - Check the location dataset against the compiled-in state catalog
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::EdgeConfig;
use crate::observability::logging::LogFormat;
use crate::routing::catalog::{self, ROOT_DOMAIN};
use crate::routing::subdomain;
use crate::routing::Scheme;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("upstream.default_scheme: expected 'http' or 'https', got '{0}'")]
    InvalidScheme(String),

    #[error("observability.log_format: expected 'pretty' or 'json', got '{0}'")]
    InvalidLogFormat(String),

    #[error("location '{0}': id must be a lowercase DNS label")]
    InvalidLocationId(String),

    #[error("location '{0}': id collides with a state or main-site subdomain")]
    ReservedLocationId(String),

    #[error("location '{id}': unknown state code '{state}'")]
    UnknownState { id: String, state: String },

    #[error("location '{0}': duplicate id")]
    DuplicateLocation(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    check_address(&mut errors, "upstream.address", &config.upstream.address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if Scheme::parse(&config.upstream.default_scheme).is_none() {
        errors.push(ValidationError::InvalidScheme(
            config.upstream.default_scheme.clone(),
        ));
    }
    if config.observability.log_format.parse::<LogFormat>().is_err() {
        errors.push(ValidationError::InvalidLogFormat(
            config.observability.log_format.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    let mut seen = HashSet::new();
    for location in &config.locations {
        let id = location.id.as_str();
        if !is_dns_label(id) {
            errors.push(ValidationError::InvalidLocationId(id.to_string()));
        } else if catalog::is_state_code(id) || subdomain::is_root_like(id, ROOT_DOMAIN) {
            errors.push(ValidationError::ReservedLocationId(id.to_string()));
        }
        if !catalog::is_state_code(&location.state) {
            errors.push(ValidationError::UnknownState {
                id: id.to_string(),
                state: location.state.clone(),
            });
        }
        if !seen.insert(id) {
            errors.push(ValidationError::DuplicateLocation(id.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn is_dns_label(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 63
        && !s.starts_with('-')
        && !s.ends_with('-')
        && s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
