//! # Service Registry
//!
//! Static mapping from logical service name to base URL. The registry is
//! built once at startup from [`GatewayConfig`] and is immutable for the
//! life of the process; every request-handling task reads it through a
//! shared reference. Health-checked dynamic registration is an explicit
//! non-feature of this design.
//!
//! [`GatewayConfig`]: crate::core::config::GatewayConfig

use std::collections::HashMap;

use url::Url;

use crate::core::error::{GatewayError, GatewayResult};

/// Immutable service name -> base URL table
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    services: HashMap<String, Url>,
}

impl ServiceRegistry {
    /// Build a registry from name -> URL string pairs, validating every URL
    /// up front so a bad table fails the process at startup rather than on
    /// first request.
    pub fn from_table(table: &HashMap<String, String>) -> GatewayResult<Self> {
        let mut services = HashMap::with_capacity(table.len());
        for (name, raw_url) in table {
            let url = Url::parse(raw_url).map_err(|e| {
                GatewayError::config(format!("Invalid URL for service {}: {}", name, e))
            })?;
            services.insert(name.clone(), url);
        }
        Ok(Self { services })
    }

    /// Resolve a logical service name to its base URL.
    ///
    /// Absence is a client-visible 404 carrying the requested name.
    pub fn resolve(&self, service: &str) -> GatewayResult<&Url> {
        self.services
            .get(service)
            .ok_or_else(|| GatewayError::service_not_found(service))
    }

    /// Whether a service name is registered
    pub fn contains(&self, service: &str) -> bool {
        self.services.contains_key(service)
    }

    /// Number of registered services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_service_urls;

    #[test]
    fn test_resolve_known_service() {
        let registry = ServiceRegistry::from_table(&default_service_urls()).unwrap();
        let url = registry.resolve("risk-assessment").unwrap();
        assert_eq!(url.as_str(), "http://risk-assessment:8082/");
    }

    #[test]
    fn test_resolve_unknown_service_is_not_found() {
        let registry = ServiceRegistry::from_table(&default_service_urls()).unwrap();
        let err = registry.resolve("no-such-service").unwrap_err();
        match err {
            GatewayError::ServiceNotFound { service } => {
                assert_eq!(service, "no-such-service");
            }
            other => panic!("expected ServiceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_url_rejected_at_startup() {
        let mut table = HashMap::new();
        table.insert("broken".to_string(), "not a url".to_string());
        assert!(ServiceRegistry::from_table(&table).is_err());
    }
}
