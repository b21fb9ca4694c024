//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the upstream response to the caller (status, headers, body verbatim)
//! - Strip hop-by-hop headers that belong to the upstream connection
//! - Build the fixed plain-text failure responses
//!
//! # Design Decisions
//! - Bodies are fully buffered; no streaming
//! - Failure bodies are constants, never parameterized with error detail

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;

use crate::security::headers::strip_hop_by_hop;
use crate::upstream::UpstreamResponse;

/// Body for a missing or mismatched shared secret (407).
pub const UNAUTHORIZED_BODY: &str = "Missing or invalid proxy key.";
/// Body for a path the mapper cannot route (400).
pub const BAD_PATH_BODY: &str = "URL format invalid.";
/// Body once every attempt failed at the transport level (500).
pub const RETRY_EXHAUSTED_BODY: &str = "Proxy failed to connect. Please try again.";
/// Body for an inbound request over the buffering limit (413).
pub const BODY_TOO_LARGE_BODY: &str = "Request body too large.";

/// Build a plain-text response with a fixed body.
pub fn text_response(status: StatusCode, body: &'static str) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Convert a completed upstream exchange into the caller-facing response.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let UpstreamResponse {
        status,
        mut headers,
        body,
    } = upstream;
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
