//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check that hosts, header names and header values are well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::schema::{BackoffKind, ProxyConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a fully loaded configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }

    let upstream = &config.upstream;
    if let Err(message) = check_host(&upstream.base_domain) {
        errors.push(ValidationError::new("upstream.base_domain", message));
    }
    if let Some(self_host) = &upstream.self_host {
        if let Err(message) = check_host(self_host) {
            errors.push(ValidationError::new("upstream.self_host", message));
        }
    }
    if upstream.scheme != "https" && upstream.scheme != "http" {
        errors.push(ValidationError::new(
            "upstream.scheme",
            format!("unsupported scheme {:?}", upstream.scheme),
        ));
    }
    for path in &upstream.pinned_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(
                "upstream.pinned_paths",
                format!("{:?} must start with '/'", path),
            ));
        }
    }
    if HeaderValue::from_str(&upstream.user_agent).is_err() {
        errors.push(ValidationError::new("upstream.user_agent", "not a valid header value"));
    }
    if HeaderName::from_bytes(upstream.trust_header.as_bytes()).is_err() {
        errors.push(ValidationError::new("upstream.trust_header", "not a valid header name"));
    }
    if upstream.timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be greater than 0"));
    }
    if upstream.max_concurrent_requests == 0 {
        errors.push(ValidationError::new(
            "upstream.max_concurrent_requests",
            "must be greater than 0",
        ));
    }

    let backoff = &config.retries.backoff;
    if backoff.strategy == BackoffKind::Exponential && backoff.base_delay_ms > backoff.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.backoff",
            "base_delay_ms must not exceed max_delay_ms",
        ));
    }

    if HeaderName::from_bytes(config.access.header.as_bytes()).is_err() {
        errors.push(ValidationError::new("access.header", "not a valid header name"));
    }
    if matches!(config.access.secret.as_deref(), Some("")) {
        errors.push(ValidationError::new(
            "access.secret",
            "must not be empty; omit it to run without an access gate",
        ));
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Accepts `name` or `name:port`; anything that would smuggle a path,
/// query or userinfo into the authority is rejected.
fn check_host(host: &str) -> Result<(), String> {
    if host.is_empty() {
        return Err("must not be empty".to_string());
    }
    let url = Url::parse(&format!("http://{}/", host))
        .map_err(|e| format!("{:?} is not a valid host: {}", host, e))?;
    let clean = url.host_str().is_some()
        && url.username().is_empty()
        && url.password().is_none()
        && url.path() == "/"
        && url.query().is_none()
        && url.fragment().is_none();
    if clean {
        Ok(())
    } else {
        Err(format!("{:?} is not a bare host", host))
    }
}
