//! Forwarding engine.
//!
//! # State Machine
//! ```text
//! Attempting(n) ── mapper fails ─────────────────▶ Rejected(400)
//! Attempting(n) ── upstream responds ────────────▶ Completed(response)
//! Attempting(n) ── transport error, n < bound ───▶ Attempting(n+1)
//! Attempting(n) ── transport error, n = bound ───▶ Failed(500)
//! ```
//!
//! Each attempt re-runs mapper, header filter and client from scratch.
//! Any upstream status, 5xx included, completes the request.

use tracing::Instrument;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::observability::metrics;
use crate::resilience::{RetryPolicy, RetryState};
use crate::routing::UrlMapper;
use crate::security::headers::{HeaderFilter, InvalidHeader};
use crate::upstream::{InboundRequest, OutboundRequest, UpstreamClient, UpstreamResponse};

/// Orchestrates mapper, header filter and upstream client under the retry policy.
#[derive(Debug)]
pub struct ForwardingEngine<C> {
    mapper: UrlMapper,
    filter: HeaderFilter,
    client: C,
    policy: RetryPolicy,
}

impl<C: UpstreamClient> ForwardingEngine<C> {
    pub fn new(mapper: UrlMapper, filter: HeaderFilter, client: C, policy: RetryPolicy) -> Self {
        Self {
            mapper,
            filter,
            client,
            policy,
        }
    }

    pub fn from_config(config: &ProxyConfig, client: C) -> Result<Self, InvalidHeader> {
        Ok(Self::new(
            UrlMapper::from_config(&config.upstream),
            HeaderFilter::from_config(&config.upstream)?,
            client,
            RetryPolicy::from_config(&config.retries),
        ))
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Build the outbound request for one attempt.
    pub fn prepare(&self, inbound: &InboundRequest) -> Result<OutboundRequest, ProxyError> {
        let target = self.mapper.map(&inbound.target)?;
        Ok(OutboundRequest::new(
            inbound.method.clone(),
            target,
            self.filter.apply(&inbound.headers),
            inbound.body.clone(),
        ))
    }

    /// Forward `inbound` until it completes, is rejected, or exhausts its retries.
    pub async fn forward(&self, inbound: &InboundRequest) -> Result<UpstreamResponse, ProxyError> {
        let mut state = RetryState::new();

        loop {
            let attempt = state.attempt();
            let outbound = self.prepare(inbound)?;
            let span = tracing::debug_span!(
                "upstream_attempt",
                attempt,
                upstream = %outbound.target(),
                route = outbound.target().kind().as_str(),
            );

            match self.client.send(outbound).instrument(span).await {
                Ok(response) => {
                    metrics::record_upstream_attempt("success");
                    tracing::debug!(attempt, status = %response.status, "Upstream responded");
                    return Ok(response);
                }
                Err(e) => {
                    metrics::record_upstream_attempt("transport_error");
                    tracing::warn!(attempt, error = %e, "Upstream error");

                    if !state.advance(&self.policy, &inbound.method) {
                        tracing::error!(
                            attempts = attempt,
                            method = %inbound.method,
                            path = %inbound.target,
                            "Giving up on upstream"
                        );
                        return Err(ProxyError::RetryExhausted { attempts: attempt });
                    }

                    metrics::record_retry();
                    let delay = self.policy.backoff().delay(attempt);
                    if !delay.is_zero() {
                        tracing::info!(attempt, delay = ?delay, "Retrying after network error");
                        tokio::time::sleep(delay).await;
                    } else {
                        tracing::info!(attempt, "Retrying after network error");
                    }
                }
            }
        }
    }
}
