//! API gateway library.
//!
//! Authenticates bearer tokens and relays `/gateway/*` calls to the backend
//! service registered for each logical service name.

pub mod auth;
pub mod config;
pub mod error;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod resources;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use forward::{ForwardRequest, Forwarder};
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use registry::{ServiceName, ServiceRegistry};
