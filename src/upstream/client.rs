//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Send one outbound request and buffer the full response
//! - Share pooled connections across every in-flight request
//! - Bound the number of concurrent upstream requests
//! - Report any network-level failure as a retryable `TransportError`
//!
//! # Design Decisions
//! - No internal retries; the forwarding engine owns the retry policy
//! - Redirects are relayed to the caller, never followed
//! - The read timeout covers the whole exchange, body included
//! - Waiting for a concurrency slot is bounded by the same timeout; a request
//!   that cannot get one fails as `TransportError::Saturated`

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::config::UpstreamConfig;
use crate::error::TransportError;
use crate::security::headers::strip_for_upstream;
use crate::upstream::types::{OutboundRequest, UpstreamResponse};

/// Sends outbound requests. Implementations must be safe to share across
/// concurrent forwarding operations without external locking.
pub trait UpstreamClient: Send + Sync + 'static {
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl Future<Output = Result<UpstreamResponse, TransportError>> + Send;
}

/// `reqwest`-backed client with connection reuse.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
    limiter: Arc<Semaphore>,
    slot_timeout: Duration,
}

impl HttpUpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        tracing::debug!(
            timeout_secs = config.timeout_secs,
            idle_timeout_secs = config.idle_timeout_secs,
            max_concurrent = config.max_concurrent_requests,
            "Upstream client ready"
        );

        Ok(Self {
            client,
            limiter: Arc::new(Semaphore::new(config.max_concurrent_requests)),
            slot_timeout: timeout,
        })
    }

    /// Free upstream request slots.
    pub fn available_permits(&self) -> usize {
        self.limiter.available_permits()
    }
}

impl UpstreamClient for HttpUpstreamClient {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, TransportError> {
        // Held until the body is fully read
        let _permit = tokio::time::timeout(self.slot_timeout, self.limiter.acquire())
            .await
            .map_err(|_| TransportError::Saturated)?
            .map_err(|_| TransportError::Saturated)?;

        let (method, target, mut headers, body) = request.into_parts();
        strip_for_upstream(&mut headers);

        let mut builder = self.client.request(method, target.into_url()).headers(headers);
        if !body.is_empty() {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
