//! Request identification.
//!
//! # Responsibilities
//! - Reuse the caller's `x-request-id`, or generate a UUID v4
//! - Carry the ID in a request extension for spans and log fields
//!
//! # Design Decisions
//! - The ID never touches the header map; forwarded and relayed headers stay
//!   exactly what the caller and upstream sent
//! - A caller-supplied `x-request-id` is an ordinary header and travels
//!   upstream like any other

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Header a caller may use to supply its own request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates random (v4) UUID request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Middleware attaching a [`RequestId`] extension to every request.
pub async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = match req.headers().get(X_REQUEST_ID) {
        Some(value) => Some(RequestId::new(value.clone())),
        None => MakeRequestUuidV4.make_request_id(&req),
    };
    if let Some(id) = id {
        req.extensions_mut().insert(id);
    }
    next.run(req).await
}

/// The request ID attached by [`assign_request_id`], or "unknown".
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("unknown")
}

/// Root span for one inbound request, used by the trace layer.
pub fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request),
    )
}
