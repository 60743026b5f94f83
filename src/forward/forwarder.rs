//! Upstream request forwarding.
//!
//! # Responsibilities
//! - Resolve the logical service before any I/O
//! - Issue exactly one upstream call per request (no retries)
//! - Map the upstream outcome: JSON value, explicit null, or error
//!
//! # Design Decisions
//! - Paths are appended to the base URL verbatim
//! - Upstream error bodies are relayed untouched with the upstream status
//! - An empty success body is `None`, never an empty object

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{redirect, Client, ClientBuilder};
use serde_json::Value;

use crate::config::TimeoutConfig;
use crate::error::GatewayError;
use crate::observability::metrics;
use crate::registry::{ServiceName, ServiceRegistry};

/// Methods the gateway relays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ForwardMethod {
    /// Whether a JSON body is sent with this method.
    pub fn carries_body(self) -> bool {
        matches!(self, ForwardMethod::Post | ForwardMethod::Put)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ForwardMethod::Get => "GET",
            ForwardMethod::Post => "POST",
            ForwardMethod::Put => "PUT",
            ForwardMethod::Delete => "DELETE",
        }
    }
}

impl From<ForwardMethod> for reqwest::Method {
    fn from(method: ForwardMethod) -> Self {
        match method {
            ForwardMethod::Get => reqwest::Method::GET,
            ForwardMethod::Post => reqwest::Method::POST,
            ForwardMethod::Put => reqwest::Method::PUT,
            ForwardMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for ForwardMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upstream call, built per inbound request and consumed once.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub service: ServiceName,
    pub path: String,
    pub method: ForwardMethod,
    pub body: Option<Value>,
    /// Propagated upstream as `x-request-id`.
    pub request_id: Option<String>,
}

impl ForwardRequest {
    pub fn new(service: ServiceName, method: ForwardMethod, path: impl Into<String>) -> Self {
        Self {
            service,
            path: path.into(),
            method,
            body: None,
            request_id: None,
        }
    }

    pub fn get(service: ServiceName, path: impl Into<String>) -> Self {
        Self::new(service, ForwardMethod::Get, path)
    }

    pub fn post(service: ServiceName, path: impl Into<String>, body: Value) -> Self {
        Self::new(service, ForwardMethod::Post, path).with_body(body)
    }

    pub fn put(service: ServiceName, path: impl Into<String>, body: Value) -> Self {
        Self::new(service, ForwardMethod::Put, path).with_body(body)
    }

    pub fn delete(service: ServiceName, path: impl Into<String>) -> Self {
        Self::new(service, ForwardMethod::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Upstream value on success. `None` means the upstream sent an empty body.
pub type ForwardResult = Result<Option<Value>, GatewayError>;

/// Relays logical requests to their upstream services.
#[derive(Clone)]
pub struct Forwarder {
    registry: Arc<ServiceRegistry>,
    client: Client,
}

impl Forwarder {
    pub fn new(registry: Arc<ServiceRegistry>, client: Client) -> Self {
        Self { registry, client }
    }

    /// Build a forwarder with an HTTP client configured from `timeouts`.
    pub fn from_config(registry: Arc<ServiceRegistry>, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = Self::client_builder(timeouts).build()?;
        Ok(Self::new(registry, client))
    }

    /// Upstream client settings. A 3xx is relayed to the caller, not
    /// followed. Unset timeouts leave the transport defaults.
    pub fn client_builder(timeouts: &TimeoutConfig) -> ClientBuilder {
        let mut builder = Client::builder().redirect(redirect::Policy::none());
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.upstream_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub async fn forward(&self, request: ForwardRequest) -> ForwardResult {
        let ForwardRequest {
            service,
            path,
            method,
            body,
            request_id,
        } = request;

        let Some(base_url) = self.registry.resolve(service.as_str()) else {
            tracing::warn!(service = %service, "Unknown logical service");
            return Err(GatewayError::ServiceNotFound(service));
        };
        let url = format!("{}{}", base_url, path);

        tracing::debug!(
            service = %service,
            method = %method,
            url = %url,
            request_id = request_id.as_deref().unwrap_or("-"),
            "Forwarding request"
        );

        let mut outbound = self.client.request(method.into(), &url);
        if let Some(id) = &request_id {
            outbound = outbound.header("x-request-id", id.as_str());
        }
        match body {
            Some(body) if method.carries_body() => outbound = outbound.json(&body),
            Some(_) => tracing::debug!(method = %method, "Dropping body for method without payload"),
            None => {}
        }

        let start_time = Instant::now();
        let response = match outbound.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    service = %service,
                    url = %url,
                    error = %e,
                    connect = e.is_connect(),
                    timeout = e.is_timeout(),
                    "Upstream unreachable"
                );
                metrics::record_upstream(service.as_str(), method.as_str(), "unavailable", start_time);
                return Err(GatewayError::UpstreamUnavailable { service, source: e });
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(service = %service, status = %status, error = %e, "Failed reading upstream body");
                metrics::record_upstream(service.as_str(), method.as_str(), "unavailable", start_time);
                return Err(GatewayError::UpstreamUnavailable { service, source: e });
            }
        };
        metrics::record_upstream(service.as_str(), method.as_str(), status.as_str(), start_time);

        if status.as_u16() >= 400 {
            tracing::warn!(service = %service, status = %status, "Upstream returned error");
            return Err(GatewayError::UpstreamError { status, body: text });
        }

        if text.is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text).map(Some).map_err(|e| {
            tracing::error!(service = %service, status = %status, error = %e, "Upstream body is not JSON");
            GatewayError::UpstreamInvalidBody { service, source: e }
        })
    }
}
