//! Authentication gate for protected routes.
//!
//! [`require_bearer`] is layered explicitly onto the protected routes only;
//! public routes never reach it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::auth::extract::TokenExtractor;
use crate::auth::token::{Claims, TokenVerifier};
use crate::error::GatewayError;
use crate::observability::metrics;

/// Extracts and verifies the bearer token of a request.
pub struct Authenticator {
    extractor: TokenExtractor,
    verifier: Arc<dyn TokenVerifier>,
}

impl Authenticator {
    pub fn new(extractor: TokenExtractor, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { extractor, verifier }
    }

    pub fn authenticate(&self, parts: &Parts) -> Result<Claims, GatewayError> {
        let token = self.extractor.extract(parts).ok_or(GatewayError::AuthMissing)?;

        self.verifier.verify(&token).map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            GatewayError::AuthInvalid
        })
    }
}

/// Rejects the request or attaches [`Claims`] to its extensions.
pub async fn require_bearer(
    State(authenticator): State<Arc<Authenticator>>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let (mut parts, body) = request.into_parts();

    match authenticator.authenticate(&parts) {
        Ok(claims) => {
            tracing::debug!(subject = %claims.sub, path = %parts.uri.path(), "Request authenticated");
            parts.extensions.insert(claims);
            Ok(next.run(Request::from_parts(parts, body)).await)
        }
        Err(e) => {
            let reason = match e {
                GatewayError::AuthMissing => "missing",
                _ => "invalid",
            };
            tracing::warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                reason,
                "Rejected unauthenticated request"
            );
            metrics::record_auth_failure(reason);
            Err(e)
        }
    }
}
