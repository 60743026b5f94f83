//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Protected request
//!     → middleware.rs (require_bearer layer)
//!     → extract.rs (query param, then Authorization header)
//!     → token.rs (TokenVerifier: signature, expiry, issuer)
//!     → Claims in request extensions → handler → Forwarder
//!
//! POST /auth/login
//!     → credentials.rs (bcrypt check on the blocking pool)
//!     → token.rs (TokenIssuer) → {access_token, token_type}
//! ```
//!
//! # Design Decisions
//! - Verifier, issuer and credential store are traits injected at startup
//! - Stateless per request; tokens are never stored
//! - Missing and rejected tokens are distinct 401 errors

pub mod credentials;
pub mod extract;
pub mod login;
pub mod middleware;
pub mod token;

pub use credentials::{BcryptCredentialStore, CredentialStore};
pub use extract::{TokenExtractor, TokenSource};
pub use login::LoginService;
pub use middleware::{require_bearer, Authenticator};
pub use token::{Claims, IssuedToken, JwtCodec, TokenError, TokenIssuer, TokenVerifier};
