//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned / kept)
//!     → auth gate (protected routes only)
//!     → handlers.rs (build ForwardRequest)
//!     → Forwarder → JSON response or GatewayError
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, AuthComponents, GatewayServer};
