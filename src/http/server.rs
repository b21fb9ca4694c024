//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (request ID extension, tracing, access gate)
//! - Buffer inbound bodies and dispatch to the forwarding engine
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::request::{assign_request_id, request_id, request_span};
use crate::http::response::relay;
use crate::observability::metrics;
use crate::proxy::ForwardingEngine;
use crate::security::access_control::{access_control_middleware, AccessGate};
use crate::security::headers::InvalidHeader;
use crate::upstream::{HttpUpstreamClient, InboundRequest, UpstreamClient};

/// Error building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Header(#[from] InvalidHeader),
}

/// Application state injected into handlers.
pub struct AppState<C> {
    pub engine: Arc<ForwardingEngine<C>>,
    pub max_body_bytes: usize,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server forwarding through a pooled `reqwest` client.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let client = HttpUpstreamClient::new(&config.upstream)?;
        Self::with_client(config, client)
    }

    /// Create a server forwarding through the given upstream client.
    pub fn with_client<C: UpstreamClient>(config: ProxyConfig, client: C) -> Result<Self, ServerError> {
        let engine = ForwardingEngine::from_config(&config, client)?;
        let gate = AccessGate::from_config(&config.access)?;

        if gate.is_enabled() {
            tracing::info!(header = %gate.header(), "Access gate enabled");
        } else {
            tracing::warn!("No proxy key configured; running as an open proxy");
        }

        let state = AppState {
            engine: Arc::new(engine),
            max_body_bytes: config.listener.max_body_bytes,
        };

        let router = Self::build_router(state, Arc::new(gate));
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router<C: UpstreamClient>(state: AppState<C>, gate: Arc<AccessGate>) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler::<C>))
            .route("/", any(proxy_handler::<C>))
            .with_state(state)
            .layer(middleware::from_fn_with_state(gate, access_control_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
            .layer(middleware::from_fn(assign_request_id))
    }

    /// A handle to the router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_domain = %self.config.upstream.base_domain,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
/// Buffers the request, forwards it, and relays the outcome.
async fn proxy_handler<C: UpstreamClient>(
    State(state): State<AppState<C>>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request).to_string();

    let (parts, body) = request.into_parts();
    let method_str = parts.method.to_string();
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %target,
        "Proxying request"
    );

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to buffer request body");
            let err = ProxyError::BodyTooLarge {
                limit: state.max_body_bytes,
            };
            metrics::record_rejected(err.reason());
            metrics::record_request(&method_str, err.status().as_u16(), start_time);
            return err.into_response();
        }
    };

    let inbound = InboundRequest::new(parts.method, target, parts.headers, body);

    let response = match state.engine.forward(&inbound).await {
        Ok(upstream) => relay(upstream),
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                path = %inbound.target,
                error = %err,
                "Request failed"
            );
            metrics::record_rejected(err.reason());
            err.into_response()
        }
    };

    metrics::record_request(&method_str, response.status().as_u16(), start_time);
    response
}
