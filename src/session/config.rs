use crate::cache::DEFAULT_CACHE_ALIAS;
use crate::utils::get_env_with_prefix;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session storage engine
///
/// Selects the medium that persists per-user session state across
/// requests: the configured cache, or the application database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionEngine {
    /// Sessions live in the configured cache backend
    Cache,
    /// Sessions live in a database table
    #[cfg(feature = "sessions-db")]
    Database,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::Cache
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Session storage engine
    #[serde(default)]
    pub engine: SessionEngine,

    /// Name of the cache the cache-backed engine stores sessions in
    #[serde(default = "default_cache_alias")]
    pub cache_alias: String,

    /// Default session TTL (in seconds)
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            engine: SessionEngine::default(),
            cache_alias: default_cache_alias(),
            default_ttl_seconds: default_ttl_seconds(),
        }
    }
}

impl SessionConfig {
    /// Load session configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(engine) = get_env_with_prefix("SESSION_ENGINE") {
            config.engine = match engine.to_lowercase().as_str() {
                "database" | "db" => {
                    #[cfg(feature = "sessions-db")]
                    {
                        SessionEngine::Database
                    }
                    #[cfg(not(feature = "sessions-db"))]
                    {
                        tracing::warn!("Database sessions requested but sessions-db feature not enabled, using cache");
                        SessionEngine::Cache
                    }
                }
                _ => SessionEngine::Cache,
            };
        }

        if let Some(alias) = get_env_with_prefix("SESSION_CACHE_ALIAS") {
            config.cache_alias = alias;
        }

        if let Some(ttl) = get_env_with_prefix("SESSION_TTL_SECONDS") {
            if let Ok(seconds) = ttl.parse() {
                config.default_ttl_seconds = seconds;
            }
        }

        config
    }

    /// Default session TTL as a Duration
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }
}

fn default_cache_alias() -> String {
    DEFAULT_CACHE_ALIAS.to_string()
}

fn default_ttl_seconds() -> u64 {
    1_209_600 // two weeks
}
