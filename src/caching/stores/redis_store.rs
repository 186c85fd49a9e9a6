//! # Redis Cache Store
//!
//! Redis-backed store using a `ConnectionManager`, which multiplexes one
//! reconnecting connection across tasks. TTLs map directly onto Redis key
//! expiry, so there is no sweeping to do on this side.

use super::CacheStore;
use crate::caching::CacheResult;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;
use tracing::warn;

/// Redis-backed cache store
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis at `url` (e.g. `redis://cache:6379/0`).
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.manager.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        // Redis expiry has second granularity; never store without one
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.manager.clone();
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn health_check(&self) -> CacheResult<bool> {
        let mut conn = self.manager.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(error = %e, "redis health check failed");
                Ok(false)
            }
        }
    }
}
