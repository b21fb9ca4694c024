//! Error taxonomy for request handling.
//!
//! | Error              | Raised by       | Retried | Caller sees |
//! |--------------------|-----------------|---------|-------------|
//! | `Unauthorized`     | access gate     | no      | 407         |
//! | `InvalidPath`      | URL mapper      | no      | 400         |
//! | `TransportError`   | upstream client | yes     | (internal)  |
//! | `RetryExhausted`   | engine          | no      | 500         |
//! | `BodyTooLarge`     | HTTP handler    | no      | 413         |
//!
//! Caller-facing bodies are fixed strings; no upstream detail leaks out.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::{
    text_response, BAD_PATH_BODY, BODY_TOO_LARGE_BODY, RETRY_EXHAUSTED_BODY, UNAUTHORIZED_BODY,
};

/// The request path cannot be mapped to an upstream URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPathError {
    #[error("path {0:?} has no segment after the subdomain")]
    MissingRemainder(String),

    #[error("path {0:?} does not start with a subdomain segment")]
    EmptySubdomain(String),

    #[error("segment {0:?} is not a valid subdomain")]
    InvalidSubdomain(String),

    #[error("{0:?} does not form a valid upstream URL")]
    Unparseable(String),
}

/// A network-level failure talking to the upstream. Always retryable.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// No concurrency slot freed up within the upstream timeout.
    #[error("no upstream request slot available in time")]
    Saturated,
}

/// Terminal outcome of handling one inbound request.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("missing or invalid proxy key")]
    Unauthorized,

    #[error(transparent)]
    InvalidPath(#[from] InvalidPathError),

    #[error("upstream unreachable after {attempts} attempt(s)")]
    RetryExhausted { attempts: u32 },

    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
}

impl ProxyError {
    /// Status code relayed to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Unauthorized => StatusCode::PROXY_AUTHENTICATION_REQUIRED,
            ProxyError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ProxyError::RetryExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Short label used for the rejection metric.
    pub fn reason(&self) -> &'static str {
        match self {
            ProxyError::Unauthorized => "unauthorized",
            ProxyError::InvalidPath(_) => "invalid_path",
            ProxyError::RetryExhausted { .. } => "retry_exhausted",
            ProxyError::BodyTooLarge { .. } => "body_too_large",
        }
    }

    fn body(&self) -> &'static str {
        match self {
            ProxyError::Unauthorized => UNAUTHORIZED_BODY,
            ProxyError::InvalidPath(_) => BAD_PATH_BODY,
            ProxyError::RetryExhausted { .. } => RETRY_EXHAUSTED_BODY,
            ProxyError::BodyTooLarge { .. } => BODY_TOO_LARGE_BODY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        text_response(self.status(), self.body())
    }
}
