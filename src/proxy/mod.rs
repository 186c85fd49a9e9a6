//! # Proxy Executor
//!
//! Forwards a matched gateway request to its backing service and relays the
//! backend response verbatim. Every upstream call runs under the service's
//! circuit breaker, so a struggling backend is shed quickly instead of
//! tying up gateway connections.
//!
//! ## Rust Concepts Used
//!
//! - `Arc<T>` for sharing the executor across handler tasks
//! - `async/await` with `reqwest` for the upstream call
//! - `?` propagation of typed gateway errors into HTTP responses

use crate::core::circuit_breaker::CircuitBreakerRegistry;
use crate::core::config::{GatewayConfig, ProxyConfig};
use crate::core::error::{GatewayError, GatewayResult};
use crate::routing::{render_backend_path, RouteDescriptor, ServiceRegistry};
use axum::{
    body::Body,
    extract::Request,
    http::{header::HOST, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Request bodies are buffered before forwarding; anything larger is
/// rejected up front.
const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Sends gateway requests upstream with circuit breaking per service
pub struct ProxyExecutor {
    client: reqwest::Client,
    registry: ServiceRegistry,
    breakers: Arc<CircuitBreakerRegistry>,
    /// Backend responses with a status at or above this count as breaker
    /// failures. `None` restricts failure accounting to transport errors.
    failure_status_threshold: Option<u16>,
}

impl ProxyExecutor {
    pub fn new(
        config: &GatewayConfig,
        registry: ServiceRegistry,
        breakers: Arc<CircuitBreakerRegistry>,
    ) -> GatewayResult<Self> {
        let client = build_client(&config.proxy)?;
        Ok(Self {
            client,
            registry,
            breakers,
            failure_status_threshold: config.circuit_breaker.failure_status_threshold,
        })
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn breakers(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breakers
    }

    /// Forward `request` to the service named by `descriptor`, substituting
    /// `params` into the backend path template.
    ///
    /// The backend's status and headers pass through unchanged, including
    /// error statuses. Transport failures and circuit rejections surface as
    /// gateway-minted 503 responses instead.
    pub async fn forward(
        &self,
        descriptor: &RouteDescriptor,
        params: &[(String, String)],
        request: Request<Body>,
    ) -> GatewayResult<Response> {
        let service = descriptor.service.as_str();
        let base = self.registry.resolve(service)?;
        let final_path = render_backend_path(
            &descriptor.backend_path,
            params,
            request.uri().query(),
        );
        let target = build_target_url(base, &final_path);

        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, MAX_BODY_SIZE).await.map_err(|e| {
            GatewayError::request_construction(format!("failed to read request body: {}", e))
        })?;

        let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
            .map_err(|e| GatewayError::request_construction(format!("invalid method: {}", e)))?;

        let mut upstream = self
            .client
            .request(method, target.as_str())
            .headers(forward_headers(&parts.headers));
        if !body.is_empty() {
            upstream = upstream.body(body);
        }

        let breaker = self.breakers.get_or_create(service);
        // Dropping the permit without an outcome (client disconnect cancels
        // this future) releases the admission instead of counting it.
        let permit = breaker
            .try_acquire()
            .map_err(|_| GatewayError::CircuitOpen {
                service: service.to_string(),
            })?;

        debug!(service, target = %target, "forwarding request upstream");

        let response = match upstream.send().await {
            Ok(response) => response,
            Err(e) => {
                permit.record_failure();
                warn!(service, error = %e, "upstream request failed");
                return Err(GatewayError::service_unavailable(service, e.to_string()));
            }
        };

        let status_code = response.status().as_u16();
        match self.failure_status_threshold {
            Some(threshold) if status_code >= threshold => permit.record_failure(),
            _ => permit.record_success(),
        }

        relay_response(service, response).await
    }
}

fn build_client(proxy: &ProxyConfig) -> GatewayResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(proxy.request_timeout)
        .build()
        .map_err(|e| GatewayError::config(format!("failed to build HTTP client: {}", e)))
}

/// Join a validated base URL and an already-rendered backend path. The base
/// keeps no trailing slash and the path is absolute, so plain concatenation
/// is exact and never re-encodes the query string.
fn build_target_url(base: &Url, final_path: &str) -> String {
    format!("{}{}", base.as_str().trim_end_matches('/'), final_path)
}

/// Copy request headers for the upstream call, dropping `Host` so the HTTP
/// client derives it from the target URL.
fn forward_headers(headers: &HeaderMap) -> reqwest::header::HeaderMap {
    let mut forwarded = reqwest::header::HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if name == HOST {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes()),
            reqwest::header::HeaderValue::from_bytes(value.as_bytes()),
        ) {
            forwarded.append(name, value);
        }
    }
    forwarded
}

/// Rebuild the backend response for the client: same status, same headers,
/// same body bytes.
async fn relay_response(service: &str, response: reqwest::Response) -> GatewayResult<Response> {
    let status = StatusCode::from_u16(response.status().as_u16())
        .map_err(|e| GatewayError::internal(format!("invalid upstream status: {}", e)))?;

    let mut headers = HeaderMap::new();
    for (name, value) in response.headers() {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.append(name, value);
        }
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| GatewayError::service_unavailable(service, e.to_string()))?;

    let mut builder = Response::builder().status(status);
    if let Some(response_headers) = builder.headers_mut() {
        *response_headers = headers;
    }
    builder
        .body(Body::from(body))
        .map_err(|e| GatewayError::internal(format!("failed to build response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url_joins_without_double_slash() {
        // Url::parse normalizes a bare authority to a trailing slash
        let base = Url::parse("http://risk-assessment:8082").unwrap();
        assert_eq!(
            build_target_url(&base, "/api/v1/risks/42"),
            "http://risk-assessment:8082/api/v1/risks/42"
        );
    }

    #[test]
    fn test_target_url_preserves_query() {
        let base = Url::parse("http://news-aggregator:8083").unwrap();
        assert_eq!(
            build_target_url(&base, "/api/v1/news/articles?limit=10&q=a%2Fb"),
            "http://news-aggregator:8083/api/v1/news/articles?limit=10&q=a%2Fb"
        );
    }

    #[test]
    fn test_forward_headers_drops_host() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("gateway.internal"));
        headers.insert(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("abc-123"),
        );
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer token"),
        );

        let forwarded = forward_headers(&headers);
        assert!(forwarded.get("host").is_none());
        assert_eq!(forwarded.get("x-request-id").unwrap(), "abc-123");
        assert_eq!(forwarded.get("authorization").unwrap(), "Bearer token");
    }

    #[test]
    fn test_forward_headers_keeps_duplicates() {
        let mut headers = HeaderMap::new();
        headers.append(
            HeaderName::from_static("x-tag"),
            HeaderValue::from_static("one"),
        );
        headers.append(
            HeaderName::from_static("x-tag"),
            HeaderValue::from_static("two"),
        );

        let forwarded = forward_headers(&headers);
        let values: Vec<_> = forwarded.get_all("x-tag").iter().collect();
        assert_eq!(values.len(), 2);
    }
}
