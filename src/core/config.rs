//! # Gateway Configuration
//!
//! Environment-driven configuration for the gateway. Unlike the backend
//! services (which each carry their own config loaders), the gateway keeps a
//! single flat structure: server settings, the service URL table, and the
//! knobs for the resilience and middleware layers.
//!
//! The service URL table is an injected configuration structure rather than
//! a literal map embedded in routing logic, so deployments can override any
//! backend's base URL with `SERVICE_URL_<NAME>` (dashes become underscores,
//! e.g. `SERVICE_URL_RISK_ASSESSMENT=http://localhost:9000`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::core::error::{GatewayError, GatewayResult};

/// Default backend base URLs, keyed by logical service name.
///
/// These match the in-cluster DNS names used by the platform's compose and
/// Kubernetes manifests. Every name here must stay in sync with the route
/// table in `routing::routes`.
const DEFAULT_SERVICE_URLS: &[(&str, &str)] = &[
    ("iam", "http://iam-service:8081"),
    ("risk-assessment", "http://risk-assessment:8082"),
    ("news-aggregator", "http://news-aggregator:8083"),
    ("ingestion-service", "http://ingestion-service:8084"),
    ("normalization-service", "http://normalization-service:8085"),
    ("audit-service", "http://audit-logging:8086"),
    ("ml-infrastructure", "http://ml-infrastructure:8087"),
    ("nlp-service", "http://nlp-service:8088"),
    ("graph-intelligence", "http://graph-intelligence:8089"),
    ("xai-service", "http://xai-service:8090"),
    ("model-serving", "http://model-serving:8091"),
    ("model-monitoring", "http://model-monitoring:8092"),
    ("scenario-simulation", "http://scenario-simulation:8093"),
    ("war-gaming", "http://war-gaming:8094"),
    ("digital-twins", "http://digital-twins:8095"),
    ("policy-impact", "http://policy-impact:8096"),
    ("multi-region", "http://multi-region:8097"),
    ("data-residency", "http://data-residency:8098"),
    ("federated-learning", "http://federated-learning:8099"),
    ("mobile-api", "http://mobile-api:8100"),
    ("compliance-automation", "http://compliance-automation:8101"),
    ("performance-optimization", "http://performance-optimization:8102"),
    ("cost-optimization", "http://cost-optimization:8103"),
    ("advanced-rd", "http://advanced-rd:8104"),
    ("security-certification", "http://security-certification:8105"),
    ("continuous-improvement", "http://continuous-improvement:8106"),
    ("entity-service", "http://entity-service:8107"),
    ("geospatial-service", "http://geospatial-service:8108"),
    ("intelligence-service", "http://intelligence-service:8109"),
];

/// Top-level gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Deployment environment ("development", "production", ...)
    pub environment: String,

    /// HTTP listen port
    pub port: u16,

    /// HMAC secret for bearer token validation
    pub jwt_secret: String,

    /// Comma-separated CORS allow-list
    pub allowed_origins: Vec<String>,

    /// Log filter directive (overridden by RUST_LOG if set)
    pub log_level: String,

    /// Logical service name -> base URL
    pub services: HashMap<String, String>,

    /// Outbound proxy behavior
    pub proxy: ProxyConfig,

    /// Circuit breaker tuning, shared by all per-service breakers
    pub circuit_breaker: CircuitBreakerSettings,

    /// Rate limiting windows
    pub rate_limit: RateLimitSettings,

    /// Response cache behavior
    pub cache: CacheSettings,
}

/// Outbound proxy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Fixed upper-bound timeout for a single outbound call. The inbound
    /// request's own deadline still applies; the shorter of the two governs.
    pub request_timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Circuit breaker tuning parameters
///
/// Defaults reproduce the platform's resilience policy: a breaker trips when
/// at least 5 requests were seen in the current 10 s counting interval and
/// at least 60% of them failed; an open breaker cools down for 30 s before
/// allowing 3 half-open probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerSettings {
    /// Counting interval after which Closed-state counters reset
    pub interval: Duration,

    /// How long an Open breaker rejects before transitioning to HalfOpen
    pub timeout: Duration,

    /// Trial requests allowed through in HalfOpen
    pub max_requests: u32,

    /// Minimum requests in the interval before the ratio is consulted
    pub request_volume_threshold: u32,

    /// Failure ratio at or above which the breaker trips
    pub failure_ratio: f64,

    /// Backend status codes at or above this value count as failures for
    /// trip purposes (the response is still passed through unchanged).
    /// `None` restricts failure counting to transport errors only.
    pub failure_status_threshold: Option<u16>,
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            max_requests: 3,
            request_volume_threshold: 5,
            failure_ratio: 0.6,
            failure_status_threshold: Some(500),
        }
    }
}

/// Fixed-window rate limit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Requests per window per client IP for general routes
    pub general_limit: u32,

    /// Requests per window per client IP for sensitive routes (auth)
    pub strict_limit: u32,

    /// Window length; counters reset at window boundaries
    pub window: Duration,

    /// Whether `X-Forwarded-For` identifies the client. Only safe when the
    /// gateway sits behind a trusted edge proxy that overwrites the header;
    /// a directly exposed gateway must use peer addresses, since clients
    /// can mint a fresh header value per request.
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            general_limit: 100,
            strict_limit: 20,
            window: Duration::from_secs(60),
            trust_forwarded_for: true,
        }
    }
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Whether the GET response cache is enabled at all
    pub enabled: bool,

    /// TTL applied to cached responses
    pub ttl: Duration,

    /// Redis connection URL; when unset the in-memory store is used
    pub redis_url: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(60),
            redis_url: None,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "https://localhost:3000".to_string(),
            ],
            log_level: "info".to_string(),
            services: default_service_urls(),
            proxy: ProxyConfig::default(),
            circuit_breaker: CircuitBreakerSettings::default(),
            rate_limit: RateLimitSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the process environment, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> GatewayResult<Self> {
        let mut config = Self::default();

        config.environment = env_or("ENVIRONMENT", &config.environment);
        config.log_level = env_or("LOG_LEVEL", &config.log_level);
        config.jwt_secret = env_or("JWT_SECRET", &config.jwt_secret);

        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| GatewayError::config(format!("Invalid PORT value: {}", port)))?;
        }

        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }

        if let Ok(ttl) = std::env::var("CACHE_TTL_SECS") {
            let secs: u64 = ttl
                .parse()
                .map_err(|_| GatewayError::config(format!("Invalid CACHE_TTL_SECS: {}", ttl)))?;
            config.cache.ttl = Duration::from_secs(secs);
        }
        config.cache.redis_url = std::env::var("REDIS_URL").ok();

        if let Ok(trust) = std::env::var("TRUST_FORWARDED_FOR") {
            config.rate_limit.trust_forwarded_for = trust.parse().map_err(|_| {
                GatewayError::config(format!("Invalid TRUST_FORWARDED_FOR: {}", trust))
            })?;
        }

        // Per-service base URL overrides: SERVICE_URL_RISK_ASSESSMENT etc.
        for (name, url) in config.services.iter_mut() {
            let var = format!("SERVICE_URL_{}", name.replace('-', "_").to_uppercase());
            if let Ok(value) = std::env::var(&var) {
                *url = value;
            }
        }

        Ok(config)
    }

    /// Whether the gateway is running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Build the default service URL table
pub fn default_service_urls() -> HashMap<String, String> {
    DEFAULT_SERVICE_URLS
        .iter()
        .map(|(name, url)| (name.to_string(), url.to_string()))
        .collect()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.port, 8080);
        assert!(!config.is_production());
        assert_eq!(config.circuit_breaker.request_volume_threshold, 5);
        assert_eq!(config.circuit_breaker.failure_ratio, 0.6);
        assert_eq!(config.rate_limit.general_limit, 100);
        assert_eq!(config.rate_limit.strict_limit, 20);
    }

    #[test]
    fn test_default_service_table_covers_platform() {
        let services = default_service_urls();
        assert_eq!(services.len(), DEFAULT_SERVICE_URLS.len());
        assert_eq!(
            services.get("risk-assessment").map(String::as_str),
            Some("http://risk-assessment:8082")
        );
        assert_eq!(
            services.get("iam").map(String::as_str),
            Some("http://iam-service:8081")
        );
        assert!(services.contains_key("continuous-improvement"));
    }

    #[test]
    fn test_env_override_for_service_url() {
        // Env mutation is process-global; use a name no other test touches.
        std::env::set_var("SERVICE_URL_DIGITAL_TWINS", "http://localhost:9095");
        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(
            config.services.get("digital-twins").map(String::as_str),
            Some("http://localhost:9095")
        );
        std::env::remove_var("SERVICE_URL_DIGITAL_TWINS");
    }
}
