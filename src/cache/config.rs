use crate::utils::get_env_with_prefix;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name of the cache referenced by cache-backed session storage.
///
/// A single cache is configured per application, mirroring the common
/// "default" cache alias of settings-driven web frameworks.
pub const DEFAULT_CACHE_ALIAS: &str = "default";

/// Cache backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Remote Redis cache (requires cache-redis feature)
    #[cfg(feature = "cache-redis")]
    Redis,
    /// In-process local-memory cache (default)
    LocalMemory,
    /// No-op cache (for testing)
    NoOp,
}

impl Default for CacheBackend {
    fn default() -> Self {
        Self::LocalMemory
    }
}

/// Wire protocol the Redis client speaks
///
/// RESP2 is the widely supported default; RESP3 enables the newer
/// protocol on servers that offer it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RedisProtocol {
    Resp2,
    Resp3,
}

impl Default for RedisProtocol {
    fn default() -> Self {
        Self::Resp2
    }
}

/// Redis client options
///
/// Connection behavior for the remote cache: socket timeouts, the
/// retry-on-timeout flag, the concurrent connection cap, and the wire
/// protocol.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisOptions {
    /// Socket connect timeout (in seconds)
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Socket read timeout for command responses (in seconds)
    #[serde(default = "default_read_timeout_seconds")]
    pub read_timeout_seconds: u64,

    /// Retry a command once when it fails on a timeout
    #[serde(default = "default_retry_on_timeout")]
    pub retry_on_timeout: bool,

    /// Maximum number of concurrently established connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Wire protocol version
    #[serde(default)]
    pub protocol: RedisProtocol,
}

impl Default for RedisOptions {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: default_connect_timeout_seconds(),
            read_timeout_seconds: default_read_timeout_seconds(),
            retry_on_timeout: default_retry_on_timeout(),
            max_connections: default_max_connections(),
            protocol: RedisProtocol::default(),
        }
    }
}

impl RedisOptions {
    /// Connect timeout as a Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Read timeout as a Duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Cache backend type
    #[serde(default)]
    pub backend: CacheBackend,

    /// Redis connection URL (only used for the Redis backend)
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Prefix prepended to every cache key
    ///
    /// Namespaces this application's keys on a shared cache service.
    #[serde(default)]
    pub key_prefix: String,

    /// Default TTL for cached values (in seconds)
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,

    /// Maximum number of entries for the local-memory cache
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,

    /// Redis client options
    #[serde(default)]
    pub redis: RedisOptions,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            redis_url: None,
            key_prefix: String::new(),
            default_ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
            redis: RedisOptions::default(),
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment variables
    ///
    /// The remote connection string is taken from `REDIS_URL` (or
    /// `MOORING_REDIS_URL`); when `CACHE_BACKEND` is unset, the presence
    /// of a connection string selects the Redis backend.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = get_env_with_prefix("REDIS_URL") {
            config.redis_url = Some(url);
            #[cfg(feature = "cache-redis")]
            {
                config.backend = CacheBackend::Redis;
            }
        }

        if let Some(backend) = get_env_with_prefix("CACHE_BACKEND") {
            config.backend = match backend.to_lowercase().as_str() {
                "redis" => {
                    #[cfg(feature = "cache-redis")]
                    {
                        CacheBackend::Redis
                    }
                    #[cfg(not(feature = "cache-redis"))]
                    {
                        tracing::warn!("Redis cache requested but cache-redis feature not enabled, using local memory");
                        CacheBackend::LocalMemory
                    }
                }
                "noop" => CacheBackend::NoOp,
                _ => CacheBackend::LocalMemory,
            };
        }

        if let Some(prefix) = get_env_with_prefix("CACHE_KEY_PREFIX") {
            config.key_prefix = prefix;
        }

        if let Some(ttl) = get_env_with_prefix("CACHE_DEFAULT_TTL_SECONDS") {
            if let Ok(seconds) = ttl.parse() {
                config.default_ttl_seconds = seconds;
            }
        }

        if let Some(max) = get_env_with_prefix("CACHE_MAX_ENTRIES") {
            if let Ok(entries) = max.parse() {
                config.max_entries = entries;
            }
        }

        if let Some(timeout) = get_env_with_prefix("CACHE_REDIS_CONNECT_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse() {
                config.redis.connect_timeout_seconds = seconds;
            }
        }

        if let Some(timeout) = get_env_with_prefix("CACHE_REDIS_READ_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse() {
                config.redis.read_timeout_seconds = seconds;
            }
        }

        if let Some(retry) = get_env_with_prefix("CACHE_REDIS_RETRY_ON_TIMEOUT") {
            config.redis.retry_on_timeout = retry.parse().unwrap_or(true);
        }

        if let Some(max) = get_env_with_prefix("CACHE_REDIS_MAX_CONNECTIONS") {
            if let Ok(connections) = max.parse() {
                config.redis.max_connections = connections;
            }
        }

        if let Some(protocol) = get_env_with_prefix("CACHE_REDIS_PROTOCOL") {
            config.redis.protocol = match protocol.to_lowercase().as_str() {
                "resp3" => RedisProtocol::Resp3,
                _ => RedisProtocol::Resp2,
            };
        }

        config
    }

    /// Default TTL as a Duration
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }
}

fn default_ttl_seconds() -> u64 {
    300 // 5 minutes
}

fn default_max_entries() -> u64 {
    10_000
}

fn default_connect_timeout_seconds() -> u64 {
    5
}

fn default_read_timeout_seconds() -> u64 {
    5
}

fn default_retry_on_timeout() -> bool {
    true
}

fn default_max_connections() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serializes tests that touch process-global environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, CacheBackend::LocalMemory);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.key_prefix, "");
        assert_eq!(config.default_ttl_seconds, 300);
        assert_eq!(config.redis.connect_timeout_seconds, 5);
        assert_eq!(config.redis.read_timeout_seconds, 5);
        assert!(config.redis.retry_on_timeout);
        assert_eq!(config.redis.max_connections, 100);
        assert_eq!(config.redis.protocol, RedisProtocol::Resp2);
    }

    #[test]
    fn test_serde_roundtrip_uses_lowercase_names() {
        let json = serde_json::to_string(&CacheConfig::default()).unwrap();
        assert!(json.contains("\"localmemory\""));
        assert!(json.contains("\"resp2\""));

        let parsed: CacheConfig = serde_json::from_str(
            r#"{"backend":"noop","key_prefix":"app_prod","redis":{"protocol":"resp3"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.backend, CacheBackend::NoOp);
        assert_eq!(parsed.key_prefix, "app_prod");
        assert_eq!(parsed.redis.protocol, RedisProtocol::Resp3);
        // Unspecified options keep their defaults
        assert_eq!(parsed.redis.max_connections, 100);
        assert_eq!(parsed.default_ttl_seconds, 300);
    }

    #[cfg(feature = "cache-redis")]
    #[test]
    fn test_redis_url_selects_redis_backend() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MOORING_REDIS_URL", "redis://cache.internal:6379/0");
        }
        let config = CacheConfig::from_env();
        unsafe {
            std::env::remove_var("MOORING_REDIS_URL");
        }

        assert_eq!(config.backend, CacheBackend::Redis);
        assert_eq!(
            config.redis_url.as_deref(),
            Some("redis://cache.internal:6379/0")
        );
    }

    #[test]
    fn test_explicit_backend_overrides_url_detection() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MOORING_REDIS_URL", "redis://cache.internal:6379/0");
            std::env::set_var("MOORING_CACHE_BACKEND", "localmemory");
        }
        let config = CacheConfig::from_env();
        unsafe {
            std::env::remove_var("MOORING_REDIS_URL");
            std::env::remove_var("MOORING_CACHE_BACKEND");
        }

        assert_eq!(config.backend, CacheBackend::LocalMemory);
        // The URL is still recorded for a later switch back
        assert!(config.redis_url.is_some());
    }
}
