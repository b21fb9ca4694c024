//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (serde)
//!     → loader.rs (optional TOML file)
//!     → loader.rs (PORT / TIMEOUT / RETRIES / KEY overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to the engine and access gate at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; request handling never reads the environment
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, ConfigError};
pub use schema::{
    AccessConfig, BackoffConfig, BackoffKind, ListenerConfig, LogFormat, ObservabilityConfig,
    ProxyConfig, RetryConfig, UpstreamConfig,
};
pub use validation::ValidationError;
