use crate::error::{MooringError, Result};
use crate::traits::cache::Cache;
use crate::traits::session::{SessionData, SessionStore};
use async_trait::async_trait;
use std::sync::Arc;

/// Key namespace separating sessions from other cached values
const SESSION_KEY_PREFIX: &str = "session";

/// Cache-backed session store
///
/// Persists sessions in whatever cache backend the application has
/// configured, keyed as `session:{id}`. The cache entry TTL tracks the
/// session expiry, so the backend drops expired sessions on its own.
#[derive(Clone)]
pub struct CacheSessionStore {
    cache: Arc<dyn Cache>,
}

impl CacheSessionStore {
    /// Create a session store on top of a cache backend
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    fn cache_key(session_id: &str) -> String {
        format!("{}:{}", SESSION_KEY_PREFIX, session_id)
    }
}

#[async_trait]
impl SessionStore for CacheSessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<SessionData>> {
        let key = Self::cache_key(session_id);

        let Some(bytes) = self.cache.get_bytes(&key).await? else {
            return Ok(None);
        };

        let session: SessionData = serde_json::from_slice(&bytes)
            .map_err(|e| MooringError::session(format!("Failed to deserialize session: {}", e)))?;

        // The cache TTL normally handles this, but guard against
        // backends without expiration
        if session.is_expired() {
            self.cache.delete(&key).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn save(&self, session_id: &str, data: SessionData) -> Result<()> {
        let ttl = data.remaining_ttl().ok_or_else(|| {
            MooringError::session(format!("Refusing to save expired session {}", session_id))
        })?;

        let bytes = serde_json::to_vec(&data)
            .map_err(|e| MooringError::session(format!("Failed to serialize session: {}", e)))?;

        self.cache
            .set_bytes(&Self::cache_key(session_id), bytes, Some(ttl))
            .await
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        self.cache.delete(&Self::cache_key(session_id)).await
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        // Expiry is delegated to the cache backend's TTL handling
        Ok(0)
    }

    fn is_healthy(&self) -> bool {
        self.cache.is_healthy()
    }
}
