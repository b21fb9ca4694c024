//! Access Control Middleware.
//! Enforces the shared-secret proxy key.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::AccessConfig;
use crate::error::ProxyError;
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::security::headers::InvalidHeader;

/// Admit/reject decision for inbound requests.
#[derive(Debug, Clone)]
pub struct AccessGate {
    /// `None` means the gate is disabled (open proxy).
    secret: Option<Vec<u8>>,
    header: HeaderName,
}

impl AccessGate {
    /// A gate that admits everything.
    pub fn open(header: HeaderName) -> Self {
        Self {
            secret: None,
            header,
        }
    }

    /// A gate requiring `header` to equal `secret` byte-for-byte.
    pub fn with_secret(header: HeaderName, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Some(secret.into()),
            header,
        }
    }

    pub fn from_config(config: &AccessConfig) -> Result<Self, InvalidHeader> {
        let header = HeaderName::from_bytes(config.header.as_bytes())
            .map_err(|_| InvalidHeader::Name(config.header.clone()))?;
        Ok(match &config.secret {
            Some(secret) => Self::with_secret(header, secret.as_bytes()),
            None => Self::open(header),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// Check the credential header against the configured secret.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), ProxyError> {
        let Some(secret) = &self.secret else {
            return Ok(());
        };

        match headers.get(&self.header) {
            Some(value) if value.as_bytes() == secret.as_slice() => Ok(()),
            _ => Err(ProxyError::Unauthorized),
        }
    }
}

pub async fn access_control_middleware(
    State(gate): State<Arc<AccessGate>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match gate.check(req.headers()) {
        Ok(()) => next.run(req).await,
        Err(err) => {
            tracing::warn!(
                request_id = %request_id(&req),
                method = %req.method(),
                path = %req.uri().path(),
                header = %gate.header,
                "Rejected request without valid proxy key"
            );
            metrics::record_rejected(err.reason());
            err.into_response()
        }
    }
}
