//! In-process local-memory cache backed by moka
//!
//! The temporary/fallback backend when no remote cache service is
//! available. Entries are bounded by count, evicted with TinyLFU, and
//! expire per-entry.

use crate::cache::config::CacheConfig;
use crate::error::Result;
use crate::traits::cache::Cache;
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache as MokaCache;
use std::time::{Duration, Instant};

#[derive(Clone)]
struct Entry {
    value: Vec<u8>,
    /// Custom TTL for this entry, None means use the cache default
    custom_ttl: Option<Duration>,
}

/// Expiry policy supporting per-entry TTL on top of a configured default
struct PerEntryExpiry {
    default_ttl: Duration,
}

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.custom_ttl.unwrap_or(self.default_ttl))
    }

    fn expire_after_read(
        &self,
        _key: &String,
        _entry: &Entry,
        _read_at: Instant,
        duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        // TTL semantics, not TTI: reads don't refresh expiry
        duration_until_expiry
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.custom_ttl.unwrap_or(self.default_ttl))
    }
}

/// Local-memory cache implementation
///
/// Values live in the process and are lost on restart; nothing is shared
/// across instances. Suitable as the fallback backend while no cache
/// service is reachable, and for development.
#[derive(Clone)]
pub struct LocalMemoryCache {
    inner: MokaCache<String, Entry>,
}

impl LocalMemoryCache {
    /// Create a local-memory cache from configuration
    ///
    /// Honors `max_entries` and `default_ttl_seconds`.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_capacity(config.max_entries, config.default_ttl())
    }

    /// Create a local-memory cache with explicit bounds
    pub fn with_capacity(max_entries: u64, default_ttl: Duration) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryExpiry { default_ttl })
            .build();

        Self { inner }
    }

    /// Run pending maintenance tasks (eviction, expiration)
    ///
    /// Moka runs maintenance automatically; this forces immediate
    /// cleanup, mostly useful in tests.
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Current number of entries in the cache
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for LocalMemoryCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[async_trait]
impl Cache for LocalMemoryCache {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.get(key).await.map(|entry| entry.value))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let entry = Entry {
            value,
            custom_ttl: ttl,
        };
        self.inner.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        true
    }
}
