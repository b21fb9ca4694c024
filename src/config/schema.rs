//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind host, port, body limit).
    pub listener: ListenerConfig,

    /// Upstream domain, pinned routes and client tuning.
    pub upstream: UpstreamConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Shared-secret access gate.
    pub access: AccessConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Listening port.
    pub port: u16,

    /// Largest inbound body buffered for forwarding.
    pub max_body_bytes: usize,
}

impl ListenerConfig {
    /// The `host:port` pair handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Domain the first path segment is prepended to as a subdomain.
    pub base_domain: String,

    /// URL scheme used for every upstream request.
    pub scheme: String,

    /// Host serving pinned routes instead of the bare base domain.
    pub self_host: Option<String>,

    /// Literal path prefixes routed to the pinned host (case-sensitive).
    pub pinned_paths: Vec<String>,

    /// Identity forced onto every outbound `User-Agent`.
    pub user_agent: String,

    /// Internal trust-boundary header never forwarded upstream.
    pub trust_header: String,

    /// Upstream read timeout in seconds.
    pub timeout_secs: u64,

    /// Idle pooled connection lifetime in seconds.
    pub idle_timeout_secs: u64,

    /// Idle connections kept per upstream host.
    pub max_idle_per_host: usize,

    /// Upstream requests allowed in flight at once.
    pub max_concurrent_requests: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_domain: "roblox.com".to_string(),
            scheme: "https".to_string(),
            self_host: None,
            pinned_paths: vec![
                "/ca-1394-report".to_string(),
                "/illegal-content-reporting".to_string(),
            ],
            user_agent: "RoProxy".to_string(),
            trust_header: "Roblox-Id".to_string(),
            timeout_secs: 30,
            idle_timeout_secs: 90,
            max_idle_per_host: 32,
            max_concurrent_requests: 1024,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Additional attempts after the first. Zero or negative disables retries.
    pub max_retries: i64,

    /// Only retry idempotent methods (GET, HEAD, PUT, DELETE, OPTIONS, TRACE).
    pub idempotent_only: bool,

    /// Delay inserted between attempts.
    pub backoff: BackoffConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            idempotent_only: false,
            backoff: BackoffConfig::default(),
        }
    }
}

/// Backoff strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// Retry immediately.
    #[default]
    None,
    /// Wait `base_delay_ms` before every retry.
    Fixed,
    /// Exponential growth from `base_delay_ms`, capped at `max_delay_ms`, with jitter.
    Exponential,
}

/// Backoff configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub strategy: BackoffKind,

    /// Base delay in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay in milliseconds (exponential only).
    pub max_delay_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            strategy: BackoffKind::None,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Access gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Shared secret. `None` runs the proxy open.
    pub secret: Option<String>,

    /// Header carrying the caller's credential.
    pub header: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            secret: None,
            header: "PROXYKEY".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
