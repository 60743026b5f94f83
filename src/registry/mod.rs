//! Logical service registry.
//!
//! # Data Flow
//! ```text
//! [services.<name>] config tables
//!     → ServiceRegistry::from_config (built once at startup)
//!     → shared via Arc with the Forwarder
//!     → resolve(name) → base URL (read-only, no locking)
//! ```

use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::config::schema::ServiceConfig;

/// Symbolic name of a backend service, e.g. `student`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceName(Cow<'static, str>);

impl ServiceName {
    pub const STUDENT: ServiceName = ServiceName::from_static("student");
    pub const COURSE: ServiceName = ServiceName::from_static("course");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceName {
    fn from(name: &str) -> Self {
        Self(Cow::Owned(name.to_string()))
    }
}

impl From<String> for ServiceName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl Borrow<str> for ServiceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable mapping from logical service name to upstream base URL.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<ServiceName, String>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from the `[services]` config tables.
    pub fn from_config(services: &BTreeMap<String, ServiceConfig>) -> Self {
        services
            .iter()
            .fold(Self::new(), |registry, (name, service)| {
                registry.with_service(name.as_str(), service.base_url.as_str())
            })
    }

    /// Register a service, replacing any previous base URL for that name.
    pub fn with_service(mut self, name: impl Into<ServiceName>, base_url: impl Into<String>) -> Self {
        self.services.insert(name.into(), base_url.into());
        self
    }

    /// Base URL for `name`, if registered.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.services.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &ServiceName> {
        self.services.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_service() {
        let registry = ServiceRegistry::new()
            .with_service(ServiceName::STUDENT, "http://localhost:8001")
            .with_service("course", "http://localhost:8002");

        assert_eq!(registry.resolve("student"), Some("http://localhost:8001"));
        assert_eq!(registry.resolve(ServiceName::COURSE.as_str()), Some("http://localhost:8002"));
        assert_eq!(registry.resolve("billing"), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_from_config() {
        let mut services = BTreeMap::new();
        services.insert(
            "student".to_string(),
            ServiceConfig {
                base_url: "http://students.internal:9000".into(),
            },
        );

        let registry = ServiceRegistry::from_config(&services);
        assert_eq!(registry.resolve("student"), Some("http://students.internal:9000"));
        assert!(registry.resolve("course").is_none());
    }

    #[test]
    fn test_static_and_owned_names_are_equal() {
        assert_eq!(ServiceName::STUDENT, ServiceName::from("student".to_string()));
        assert_eq!(ServiceName::COURSE.to_string(), "course");
    }
}
