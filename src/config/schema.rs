//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the API gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Logical service name → upstream definition.
    pub services: BTreeMap<String, ServiceConfig>,

    /// Token and login settings.
    pub auth: AuthConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            services: default_services(),
            auth: AuthConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// A single upstream service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Scheme and authority, without a trailing slash (e.g., "http://localhost:8001").
    pub base_url: String,
}

fn default_services() -> BTreeMap<String, ServiceConfig> {
    let mut services = BTreeMap::new();
    services.insert(
        "student".to_string(),
        ServiceConfig {
            base_url: "http://localhost:8001".to_string(),
        },
    );
    services.insert(
        "course".to_string(),
        ServiceConfig {
            base_url: "http://localhost:8002".to_string(),
        },
    );
    services
}

/// Token issuance/verification and login settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for HS256 tokens. Overridden by `GATEWAY_JWT_SECRET`.
    pub jwt_secret: String,

    /// `iss` claim written into and required on every token.
    pub issuer: String,

    /// Token lifetime in seconds.
    pub token_ttl_secs: u64,

    /// Query parameter checked first for the bearer token.
    pub token_query_param: String,

    /// Accounts allowed to log in.
    pub users: Vec<UserConfig>,
}

pub const JWT_SECRET_PLACEHOLDER: &str = "CHANGE_ME_IN_PRODUCTION";

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // WARNING: This is a placeholder! Change this in production.
            jwt_secret: JWT_SECRET_PLACEHOLDER.to_string(),
            issuer: "api-gateway".to_string(),
            token_ttl_secs: 30 * 60,
            token_query_param: "token".to_string(),
            users: Vec::new(),
        }
    }
}

/// Login account. Only the bcrypt hash of the password is stored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    pub username: String,

    /// bcrypt hash, e.g. produced by `gateway-cli hash-password`.
    pub password_hash: String,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds. Unset keeps
    /// the HTTP client's default.
    pub connect_secs: Option<u64>,

    /// Total time for one upstream call in seconds. Unset keeps the HTTP
    /// client's default.
    pub upstream_secs: Option<u64>,

    /// Total time for an inbound request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: None,
            upstream_secs: None,
            request_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.auth.token_query_param, "token");
        assert_eq!(config.auth.token_ttl_secs, 1800);
        assert!(config.auth.users.is_empty());
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_default_services_present() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.services["student"].base_url, "http://localhost:8001");
        assert_eq!(config.services["course"].base_url, "http://localhost:8002");
    }

    #[test]
    fn test_upstream_timeouts_are_opt_in() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.timeouts.connect_secs, None);
        assert_eq!(config.timeouts.upstream_secs, None);

        let config: GatewayConfig = toml::from_str(
            r#"
            [timeouts]
            connect_secs = 2
            upstream_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.timeouts.connect_secs, Some(2));
        assert_eq!(config.timeouts.upstream_secs, Some(10));
    }

    #[test]
    fn test_partial_toml() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [services.student]
            base_url = "http://students:80"

            [auth]
            jwt_secret = "s3cret"

            [[auth.users]]
            username = "admin"
            password_hash = "$2b$04$abcdefghijklmnopqrstuv"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.services.len(), 1);
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.issuer, "api-gateway");
        assert_eq!(config.auth.users[0].username, "admin");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.timeouts.upstream_secs, None);
        assert_eq!(config.timeouts.connect_secs, None);
        assert_eq!(config.timeouts.request_secs, 60);
    }
}
