//! # Cache Stores
//!
//! Store implementations behind the response cache: an in-process map for
//! single-instance deployments and tests, Redis for shared deployments.

pub mod memory;
pub mod redis_store;

use super::CacheResult;
use async_trait::async_trait;
use std::time::Duration;

/// Backend storage for cached responses. Values are opaque byte blobs; the
/// middleware owns their encoding.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a value, `None` on miss or expiry
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store a value with a TTL
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()>;

    /// Remove a key, returning whether it was present
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Whether the store is reachable
    async fn health_check(&self) -> CacheResult<bool>;
}
