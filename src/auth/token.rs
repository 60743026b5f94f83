//! Bearer token issuance and verification.
//!
//! The gateway only depends on the [`TokenVerifier`] and [`TokenIssuer`]
//! traits; [`JwtCodec`] is the default HS256 implementation.

use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Decoded token payload, attached to the request for its lifetime only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated username.
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: u64,
    /// Expiration (unix seconds).
    pub exp: u64,
    /// Issuer.
    pub iss: String,
}

/// Errors from token handling.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("bad token signature")]
    BadSignature,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token rejected: {0}")]
    Rejected(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Malformed(e.to_string()),
            _ => TokenError::Rejected(e.to_string()),
        }
    }
}

/// Verifies an opaque bearer token and yields its claims.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// Issues bearer tokens for authenticated subjects.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError>;
}

/// Login response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
}

/// HS256 JSON Web Token codec.
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl_secs: u64,
}

impl JwtCodec {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl_secs: u64) -> Self {
        let issuer = issuer.into();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer,
            ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.issuer.clone(), config.token_ttl_secs)
    }

    /// Sign arbitrary claims. Used for issuance and by tests that need
    /// tokens with specific expiry or issuer values.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl TokenVerifier for JwtCodec {
    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

impl TokenIssuer for JwtCodec {
    fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
            iss: self.issuer.clone(),
        };

        Ok(IssuedToken {
            access_token: self.encode_claims(&claims)?,
            token_type: "Bearer".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> JwtCodec {
        JwtCodec::new(b"test-secret", "api-gateway", 60)
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = codec();
        let issued = codec.issue("admin").unwrap();
        assert_eq!(issued.token_type, "Bearer");

        let claims = codec.verify(&issued.access_token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.iss, "api-gateway");
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn test_expired_token() {
        let codec = codec();
        let now = jsonwebtoken::get_current_timestamp();
        let token = codec
            .encode_claims(&Claims {
                sub: "admin".into(),
                iat: now - 7200,
                exp: now - 3600,
                iss: "api-gateway".into(),
            })
            .unwrap();

        assert!(matches!(codec.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret() {
        let token = JwtCodec::new(b"other-secret", "api-gateway", 60)
            .issue("admin")
            .unwrap()
            .access_token;

        assert!(matches!(codec().verify(&token), Err(TokenError::BadSignature)));
    }

    #[test]
    fn test_wrong_issuer() {
        let token = JwtCodec::new(b"test-secret", "someone-else", 60)
            .issue("admin")
            .unwrap()
            .access_token;

        assert!(codec().verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            codec().verify("definitely.not.ajwt"),
            Err(TokenError::Malformed(_))
        ));
        assert!(codec().verify("abc").is_err());
    }
}
