//! Cache trait for key-value storage
//!
//! Abstracts over the configured cache backend so callers do not care
//! whether values live in a remote Redis service or in process memory.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Cache trait for key-value storage with optional TTL
///
/// Note: This trait uses type-erased serialization to be object-safe.
/// Use the helper methods `get` and `set` from [`CacheExt`] which handle
/// serialization internally.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a value from the cache as serialized bytes
    ///
    /// Returns `Ok(None)` if the key doesn't exist or has expired.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value in the cache with optional TTL
    ///
    /// If `ttl` is `None`, the backend's default expiration applies.
    async fn set_bytes(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Delete a value from the cache
    async fn delete(&self, key: &str) -> Result<()>;

    /// Clear all values from the cache
    async fn clear(&self) -> Result<()>;

    /// Check if the cache backend is healthy
    fn is_healthy(&self) -> bool;
}

/// Helper trait for type-safe cache operations
///
/// Provides the generic `get` and `set` methods that users expect.
/// Implementations use the object-safe `get_bytes` and `set_bytes`
/// internally.
pub trait CacheExt: Cache {
    /// Get a value from the cache
    async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        if let Some(bytes) = self.get_bytes(key).await? {
            serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| crate::error::MooringError::cache(format!("Failed to deserialize: {}", e)))
        } else {
            Ok(None)
        }
    }

    /// Set a value in the cache
    async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
    where
        T: serde::Serialize + Send + Sync,
    {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| crate::error::MooringError::cache(format!("Failed to serialize: {}", e)))?;
        self.set_bytes(key, bytes, ttl).await
    }
}

// Blanket implementation - all Cache implementations get CacheExt for
// free, trait objects included
impl<T: Cache + ?Sized> CacheExt for T {}
