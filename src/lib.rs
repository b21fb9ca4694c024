//! Subdomain fan-out edge proxy library.
//!
//! Forwards `/{subdomain}/{rest}` to `https://{subdomain}.{base_domain}/{rest}`,
//! pins allow-listed paths to a fixed host, gates access behind an optional
//! shared secret and retries transport failures up to a configured bound.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod resilience;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::ForwardingEngine;
