//! # In-Memory Cache Store
//!
//! A concurrent map with per-entry TTLs. Expired entries are dropped lazily
//! on access, which is sufficient for the short TTLs the response cache
//! uses; there is no background sweeper.

use super::CacheStore;
use crate::caching::CacheResult;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process cache store
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: DashMap<String, Entry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entry count, counting not-yet-swept expired entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.value.clone()));
            }
        }
        // Sweep on expired hit; remove_if re-checks under the shard lock
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn health_check(&self) -> CacheResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get_returns_value() {
        let cache = InMemoryCache::new();
        cache
            .set("k1", b"hello", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("k1").await.unwrap(), Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss_and_swept() {
        let cache = InMemoryCache::new();
        cache
            .set("k1", b"stale", Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.get("k1").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let cache = InMemoryCache::new();
        cache
            .set("k1", b"v", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(cache.delete("k1").await.unwrap());
        assert!(!cache.delete("k1").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let cache = InMemoryCache::new();
        cache
            .set("k1", b"old", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("k1", b"new", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("k1").await.unwrap(), Some(b"new".to_vec()));
    }
}
