//! Username/password login that issues bearer tokens.

use std::sync::Arc;

use crate::auth::credentials::CredentialStore;
use crate::auth::token::{IssuedToken, TokenIssuer};
use crate::error::GatewayError;

pub struct LoginService {
    credentials: Arc<dyn CredentialStore>,
    issuer: Arc<dyn TokenIssuer>,
}

impl LoginService {
    pub fn new(credentials: Arc<dyn CredentialStore>, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { credentials, issuer }
    }

    /// Check the credentials off the async runtime, then issue a token.
    pub async fn login(&self, username: String, password: String) -> Result<IssuedToken, GatewayError> {
        let credentials = self.credentials.clone();
        let subject = username.clone();
        let accepted = tokio::task::spawn_blocking(move || credentials.verify(&username, &password))
            .await
            .map_err(|e| GatewayError::Internal(format!("credential check panicked: {}", e)))?;

        if !accepted {
            tracing::warn!(username = %subject, "Login rejected");
            return Err(GatewayError::InvalidCredentials);
        }

        let token = self
            .issuer
            .issue(&subject)
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        tracing::info!(username = %subject, "Login succeeded");
        Ok(token)
    }
}
