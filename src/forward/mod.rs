//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! handler builds ForwardRequest {service, path, method, body}
//!     → forwarder.rs resolves service in ServiceRegistry (404 if absent, no I/O)
//!     → one upstream HTTP call (suspension point)
//!     → status < 400: Some(json) | None (empty body)
//!     → status >= 400: UpstreamError {status, body} relayed verbatim
//!     → transport failure: UpstreamUnavailable (503)
//! ```

pub mod forwarder;

pub use forwarder::{ForwardMethod, ForwardRequest, ForwardResult, Forwarder};
