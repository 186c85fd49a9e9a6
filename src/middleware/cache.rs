//! # Response Cache Middleware
//!
//! Serves GET responses from the cache store when a fresh entry exists and
//! records successful responses on the way out. Hits short-circuit the
//! whole downstream chain, including the proxy, and are marked with
//! `X-Cache: HIT`; everything else passes through with `X-Cache: MISS`.
//!
//! Only 2xx responses are stored. Store failures degrade to pass-through;
//! a broken cache must never break the request path.

use crate::caching::{cache_key, CacheStore, CachedResponse};
use axum::{
    body::Body,
    extract::{OriginalUri, Request, State},
    http::{
        header::{CONTENT_ENCODING, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const CACHE_STATUS_HEADER: &str = "x-cache";

/// Cached responses are bounded in size; larger bodies pass through
/// unstored.
const MAX_CACHED_BODY: usize = 4 * 1024 * 1024;

/// Shared cache handle for the middleware
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }
}

pub async fn cache_responses(
    State(cache): State<Arc<ResponseCache>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    // Nested routers strip their prefix from `uri()`; the key is derived
    // from the client-visible path, so `/api/v1/...` hashes as requested.
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone());
    let key = cache_key(uri.path(), uri.query());

    match cache.store.get(&key).await {
        Ok(Some(bytes)) => {
            if let Ok(cached) = serde_json::from_slice::<CachedResponse>(&bytes) {
                debug!(key = %key, "cache hit");
                return replay(cached);
            }
            // Undecodable entry, drop it and fall through
            let _ = cache.store.delete(&key).await;
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "cache lookup failed"),
    }

    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();
    parts.headers.insert(
        HeaderName::from_static(CACHE_STATUS_HEADER),
        HeaderValue::from_static("MISS"),
    );

    if !parts.status.is_success() {
        return Response::from_parts(parts, body);
    }

    let bytes = match axum::body::to_bytes(body, MAX_CACHED_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => {
            // Body larger than the cache bound; it has been partially
            // consumed, so this request cannot be salvaged
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut headers = Vec::new();
    for name in [CONTENT_TYPE, CONTENT_ENCODING] {
        if let Some(value) = parts.headers.get(&name) {
            if let Ok(value) = value.to_str() {
                headers.push((name.to_string(), value.to_string()));
            }
        }
    }

    let cached = CachedResponse {
        status_code: parts.status.as_u16(),
        content_type: parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string(),
        headers,
        body: bytes.to_vec(),
    };

    match serde_json::to_vec(&cached) {
        Ok(encoded) => {
            if let Err(e) = cache.store.set(&key, &encoded, cache.ttl).await {
                warn!(error = %e, "cache store failed");
            }
        }
        Err(e) => warn!(error = %e, "cache encode failed"),
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// Rebuild a response from a cache entry
fn replay(cached: CachedResponse) -> Response {
    let status =
        StatusCode::from_u16(cached.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder()
        .status(status)
        .header(HeaderName::from_static(CACHE_STATUS_HEADER), "HIT");

    for (name, value) in &cached.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if !cached.content_type.is_empty() && !has_header(&cached.headers, "content-type") {
        builder = builder.header(CONTENT_TYPE, cached.content_type.as_str());
    }

    builder
        .body(Body::from(cached.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_restores_status_headers_and_body() {
        let cached = CachedResponse {
            status_code: 200,
            content_type: "application/json".to_string(),
            headers: vec![(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )],
            body: br#"{"ok":true}"#.to_vec(),
        };

        let response = replay(cached);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-cache").unwrap(), "HIT");
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_replay_uses_content_type_field_as_fallback() {
        let cached = CachedResponse {
            status_code: 200,
            content_type: "text/plain".to_string(),
            headers: vec![],
            body: b"ok".to_vec(),
        };

        let response = replay(cached);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/plain");
    }
}
