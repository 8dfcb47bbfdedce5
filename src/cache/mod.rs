//! Caching abstractions with multiple backend implementations.
//!
//! A remote Redis backend for production and an in-process local-memory
//! backend for the temporary/fallback state, selected by configuration.

mod config;
mod in_memory;
mod noop;

#[cfg(feature = "cache-redis")]
mod redis;

pub use config::{CacheBackend, CacheConfig, DEFAULT_CACHE_ALIAS, RedisOptions, RedisProtocol};
pub use in_memory::LocalMemoryCache;
pub use noop::NoOpCache;

#[cfg(feature = "cache-redis")]
pub use redis::RedisCache;

use crate::error::Result;
use crate::traits::cache::Cache;
use std::sync::Arc;

/// Construct the cache backend selected by the configuration
///
/// Returns the configured backend as a shared trait object. Selecting
/// the Redis backend without a connection URL is a configuration error.
pub fn from_config(config: &CacheConfig) -> Result<Arc<dyn Cache>> {
    match config.backend {
        #[cfg(feature = "cache-redis")]
        CacheBackend::Redis => {
            let cache = RedisCache::new(config)?;
            tracing::info!(
                key_prefix = %config.key_prefix,
                default_ttl_seconds = config.default_ttl_seconds,
                max_connections = config.redis.max_connections,
                "Using Redis cache backend"
            );
            Ok(Arc::new(cache))
        }
        CacheBackend::LocalMemory => {
            tracing::info!(
                max_entries = config.max_entries,
                default_ttl_seconds = config.default_ttl_seconds,
                "Using local-memory cache backend"
            );
            Ok(Arc::new(LocalMemoryCache::new(config)))
        }
        CacheBackend::NoOp => {
            tracing::warn!("Using no-op cache backend, nothing will be cached");
            Ok(Arc::new(NoOpCache))
        }
    }
}
