//! # Response Caching
//!
//! Short-lived caching of GET responses. Keys are derived from the request
//! path and query string, values are full serialized responses (status,
//! content type, selected headers, body), so a hit can be replayed without
//! touching any backend.
//!
//! The store behind the cache is pluggable: Redis when a deployment has
//! one, an in-process map otherwise.

pub mod stores;

pub use stores::memory::InMemoryCache;
pub use stores::redis_store::RedisCache;
pub use stores::CacheStore;

use crate::core::error::GatewayError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Cache operation result
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-specific error types
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache store error: {message}")]
    Store { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache not available")]
    Unavailable,
}

impl From<CacheError> for GatewayError {
    fn from(err: CacheError) -> Self {
        GatewayError::internal(format!("Cache error: {}", err))
    }
}

/// A complete cached response, stored as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status_code: u16,
    pub content_type: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Derive the cache key for a request path and raw query string.
///
/// The query separator is always included, so `/a` with no query and `/a`
/// with an empty query share a key, while any real query produces its own.
pub fn cache_key(path: &str, raw_query: Option<&str>) -> String {
    let combined = format!("{}?{}", path, raw_query.unwrap_or(""));
    let digest = Sha256::digest(combined.as_bytes());
    format!("cache:api:{}", hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_known_digest() {
        assert_eq!(
            cache_key("/api/v1/risks/42", None),
            "cache:api:c32ce2146f251e0b659ba524c86c06a3f8c7dab8fec51f5f00f24deae965eb80"
        );
    }

    #[test]
    fn test_cache_key_includes_query() {
        assert_eq!(
            cache_key("/api/v1/news/articles", Some("limit=10")),
            "cache:api:25d7318feb8a8ae7f3ea69d867c448ca08d9174bd8840c8dd6661c813b92b389"
        );
    }

    #[test]
    fn test_cache_key_empty_query_matches_absent() {
        assert_eq!(
            cache_key("/api/v1/risks/42", Some("")),
            cache_key("/api/v1/risks/42", None)
        );
    }

    #[test]
    fn test_cached_response_round_trips_through_json() {
        let original = CachedResponse {
            status_code: 200,
            content_type: "application/json".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: br#"{"risk":"elevated"}"#.to_vec(),
        };

        let encoded = serde_json::to_vec(&original).unwrap();
        let decoded: CachedResponse = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded.status_code, 200);
        assert_eq!(decoded.body, original.body);
        assert_eq!(decoded.headers, original.headers);
    }
}
