//! Gateway error taxonomy.
//!
//! Every failure a client can observe is a [`GatewayError`]. Errors are
//! surfaced directly: there is no local recovery and no retry. Each variant
//! knows its HTTP status and the `detail` string rendered in the JSON body.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::registry::ServiceName;

/// Errors returned to gateway callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No bearer token in any recognized location.
    #[error("Authorization token missing")]
    AuthMissing,

    /// Token present but rejected by the verifier.
    #[error("Invalid or expired token")]
    AuthInvalid,

    /// Login with an unknown user or a wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Logical service has no registry entry.
    #[error("Service not found")]
    ServiceNotFound(ServiceName),

    /// Request payload failed validation before forwarding.
    #[error("{0}")]
    InvalidPayload(String),

    /// Upstream answered with status >= 400. Status and body are relayed as-is.
    #[error("{body}")]
    UpstreamError { status: StatusCode, body: String },

    /// Upstream could not be reached (connect, DNS, timeout, transport fault).
    #[error("Upstream service unavailable")]
    UpstreamUnavailable {
        service: ServiceName,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered successfully but the body is not JSON.
    #[error("Upstream returned an invalid response body")]
    UpstreamInvalidBody {
        service: ServiceName,
        #[source]
        source: serde_json::Error,
    },

    #[error("Internal server error")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::AuthMissing
            | GatewayError::AuthInvalid
            | GatewayError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            GatewayError::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::UpstreamError { status, .. } => *status,
            GatewayError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::UpstreamInvalidBody { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let GatewayError::Internal(reason) = &self {
            tracing::error!(reason = %reason, "Internal gateway error");
        }
        let challenge = matches!(self, GatewayError::AuthMissing | GatewayError::AuthInvalid);

        let body = ErrorBody {
            detail: self.to_string(),
        };
        let mut response = (status, Json(body)).into_response();

        if challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Errors that abort process startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
