//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate upstream base URLs so plain concatenation yields valid URLs
//! - Validate value ranges (timeouts > 0, TTL > 0, addresses parse)
//! - Reject login accounts that are not stored as bcrypt hashes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `services.student.base_url`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a valid socket address", config.listener.bind_address),
        ));
    }

    for (name, service) in &config.services {
        let field = format!("services.{}.base_url", name);
        if name.trim().is_empty() {
            errors.push(ValidationError::new("services", "service name must not be empty"));
        }
        match Url::parse(&service.base_url) {
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                errors.push(ValidationError::new(
                    &field,
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            Ok(url) if !url.has_host() => {
                errors.push(ValidationError::new(&field, "missing host"));
            }
            Ok(_) if service.base_url.ends_with('/') => {
                errors.push(ValidationError::new(&field, "must not end with '/'"));
            }
            Ok(_) => {}
            Err(e) => {
                errors.push(ValidationError::new(&field, format!("invalid URL: {}", e)));
            }
        }
    }

    let auth = &config.auth;
    if auth.jwt_secret.is_empty() {
        errors.push(ValidationError::new("auth.jwt_secret", "must not be empty"));
    }
    if auth.issuer.trim().is_empty() {
        errors.push(ValidationError::new("auth.issuer", "must not be empty"));
    }
    if auth.token_ttl_secs == 0 {
        errors.push(ValidationError::new("auth.token_ttl_secs", "must be greater than 0"));
    }
    if auth.token_query_param.trim().is_empty() {
        errors.push(ValidationError::new("auth.token_query_param", "must not be empty"));
    }

    let mut seen = HashSet::new();
    for (i, user) in auth.users.iter().enumerate() {
        if user.username.is_empty() {
            errors.push(ValidationError::new(
                format!("auth.users[{}].username", i),
                "must not be empty",
            ));
        } else if !seen.insert(user.username.as_str()) {
            errors.push(ValidationError::new(
                format!("auth.users[{}].username", i),
                format!("duplicate username '{}'", user.username),
            ));
        }
        if !looks_like_bcrypt(&user.password_hash) {
            errors.push(ValidationError::new(
                format!("auth.users[{}].password_hash", i),
                "must be a bcrypt hash (see `gateway-cli hash-password`)",
            ));
        }
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.upstream_secs", timeouts.upstream_secs),
        ("timeouts.request_secs", Some(timeouts.request_secs)),
    ] {
        if value == Some(0) {
            errors.push(ValidationError::new(field, "must be greater than 0"));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a valid socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Modular crypt format used by bcrypt: `$2a$`, `$2b$`, `$2x$` or `$2y$`.
fn looks_like_bcrypt(hash: &str) -> bool {
    let mut parts = hash.split('$');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some(""), Some("2a" | "2b" | "2x" | "2y"), Some(cost), Some(rest))
            if cost.len() == 2 && cost.chars().all(|c| c.is_ascii_digit()) && !rest.is_empty()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ServiceConfig, UserConfig};

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.auth.jwt_secret.clear();
        config.auth.token_ttl_secs = 0;
        config.timeouts.upstream_secs = Some(0);

        let errors = validate_config(&config).unwrap_err();
        let fields = fields(&errors);
        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"auth.jwt_secret"));
        assert!(fields.contains(&"auth.token_ttl_secs"));
        assert!(fields.contains(&"timeouts.upstream_secs"));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_base_url_rules() {
        let mut config = GatewayConfig::default();
        config.services.insert(
            "trailing".into(),
            ServiceConfig {
                base_url: "http://localhost:8003/".into(),
            },
        );
        config.services.insert(
            "ftp".into(),
            ServiceConfig {
                base_url: "ftp://files.internal".into(),
            },
        );
        config.services.insert(
            "garbage".into(),
            ServiceConfig {
                base_url: "::nope".into(),
            },
        );

        let errors = validate_config(&config).unwrap_err();
        let fields = fields(&errors);
        assert!(fields.contains(&"services.trailing.base_url"));
        assert!(fields.contains(&"services.ftp.base_url"));
        assert!(fields.contains(&"services.garbage.base_url"));
        assert!(!fields.contains(&"services.student.base_url"));
    }

    #[test]
    fn test_users_must_be_hashed_and_unique() {
        let mut config = GatewayConfig::default();
        config.auth.users = vec![
            UserConfig {
                username: "admin".into(),
                password_hash: "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW".into(),
            },
            UserConfig {
                username: "admin".into(),
                password_hash: "12345".into(),
            },
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["auth.users[1].username", "auth.users[1].password_hash"]
        );
    }

    #[test]
    fn test_looks_like_bcrypt() {
        assert!(looks_like_bcrypt("$2b$04$abcdefghijklmnopqrstuv"));
        assert!(looks_like_bcrypt("$2y$10$abc"));
        assert!(!looks_like_bcrypt("$1$04$abc"));
        assert!(!looks_like_bcrypt("$2b$x4$abc"));
        assert!(!looks_like_bcrypt("plaintext"));
        assert!(!looks_like_bcrypt(""));
    }
}
