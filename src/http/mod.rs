//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID extension, never a header)
//!     → security::access_control (proxy key)
//!     → server.rs handler (buffer body, hand to forwarding engine)
//!     → response.rs (relay upstream response or fixed failure body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{assign_request_id, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
