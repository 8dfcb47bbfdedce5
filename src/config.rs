use serde::{Deserialize, Serialize};

use crate::cache::{CacheBackend, CacheConfig};
use crate::error::{MooringError, Result};
use crate::session::{SessionConfig, SessionEngine};
use crate::utils::get_env_with_prefix;

/// Main configuration: cache backend, session engine, logging
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

impl Config {
    /// Production profile: Redis cache, cache-backed sessions
    ///
    /// The connection string comes from `REDIS_URL` (or
    /// `MOORING_REDIS_URL`); validation fails if it is unset.
    #[cfg(feature = "cache-redis")]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.cache.backend = CacheBackend::Redis;
        config.cache.redis_url = get_env_with_prefix("REDIS_URL");
        config.session.engine = SessionEngine::Cache;
        config
    }

    /// Temporary/fallback profile: local-memory cache, database-backed
    /// sessions
    ///
    /// For running without a cache service. Session state moves to the
    /// database so it survives restarts and is shared across instances;
    /// cached values stay in process memory.
    #[cfg(feature = "sessions-db")]
    pub fn fallback() -> Self {
        let mut config = Self::default();
        config.cache.backend = CacheBackend::LocalMemory;
        config.session.engine = SessionEngine::Database;
        config
    }

    /// Validate the configuration
    ///
    /// Checks each section and the coupling between them: cache-backed
    /// session storage must reference the configured cache, and that
    /// cache must actually retain values.
    pub fn validate(&self) -> Result<()> {
        // Cache section
        #[cfg(feature = "cache-redis")]
        if self.cache.backend == CacheBackend::Redis && self.cache.redis_url.is_none() {
            return Err(MooringError::config(
                "Redis cache backend requires a connection URL (set REDIS_URL)",
            ));
        }

        if self.cache.default_ttl_seconds == 0 {
            return Err(MooringError::config(
                "Cache default TTL must be greater than 0",
            ));
        }

        if self.cache.max_entries == 0 {
            return Err(MooringError::config(
                "Cache max_entries must be greater than 0",
            ));
        }

        if self.cache.key_prefix.chars().any(char::is_whitespace) {
            return Err(MooringError::config(format!(
                "Cache key prefix must not contain whitespace: {:?}",
                self.cache.key_prefix
            )));
        }

        if self.cache.redis.connect_timeout_seconds == 0
            || self.cache.redis.read_timeout_seconds == 0
        {
            return Err(MooringError::config(
                "Redis socket timeouts must be greater than 0",
            ));
        }

        if self.cache.redis.max_connections == 0 {
            return Err(MooringError::config(
                "Redis max_connections must be greater than 0",
            ));
        }

        // Session section
        if self.session.default_ttl_seconds == 0 {
            return Err(MooringError::config(
                "Session TTL must be greater than 0",
            ));
        }

        if self.session.engine == SessionEngine::Cache {
            if self.session.cache_alias != crate::cache::DEFAULT_CACHE_ALIAS {
                return Err(MooringError::config(format!(
                    "Session cache alias '{}' does not name a configured cache (expected '{}')",
                    self.session.cache_alias,
                    crate::cache::DEFAULT_CACHE_ALIAS
                )));
            }

            if self.cache.backend == CacheBackend::NoOp {
                return Err(MooringError::config(
                    "Cache-backed sessions cannot use the no-op cache backend, sessions would be lost on every request",
                ));
            }

            if self.cache.backend == CacheBackend::LocalMemory {
                tracing::warn!(
                    "Cache-backed sessions on the local-memory backend are lost on restart and not shared across instances"
                );
            }
        }

        // Logging section
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(MooringError::config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        Ok(())
    }
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.config.cache = cache;
        self
    }

    pub fn with_cache_backend(mut self, backend: CacheBackend) -> Self {
        self.config.cache.backend = backend;
        self
    }

    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.cache.redis_url = Some(url.into());
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.cache.key_prefix = prefix.into();
        self
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.config.session = session;
        self
    }

    pub fn with_session_engine(mut self, engine: SessionEngine) -> Self {
        self.config.session.engine = engine;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    /// Load configuration from environment variables with MOORING_ prefix
    pub fn from_env(mut self) -> Self {
        self.config.cache = CacheConfig::from_env();
        self.config.session = SessionConfig::from_env();

        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }

        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns an error if any section is invalid: a Redis backend
    /// without a connection URL, a session engine pointed at a cache
    /// that isn't configured, zero timeouts or capacities, or an
    /// unknown log level.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.cache.backend, CacheBackend::LocalMemory);
        assert_eq!(config.session.engine, SessionEngine::Cache);
        assert_eq!(config.logging.level, "info");
    }

    #[cfg(feature = "cache-redis")]
    #[test]
    fn test_redis_backend_without_url_fails_validation() {
        let err = ConfigBuilder::new()
            .with_cache_backend(CacheBackend::Redis)
            .build()
            .unwrap_err();
        assert!(matches!(err, MooringError::Config(_)));
    }

    #[cfg(feature = "cache-redis")]
    #[test]
    fn test_redis_backend_with_url_passes_validation() {
        let config = ConfigBuilder::new()
            .with_cache_backend(CacheBackend::Redis)
            .with_redis_url("redis://cache.internal:6379/0")
            .with_key_prefix("app_prod")
            .build()
            .unwrap();
        assert_eq!(config.cache.key_prefix, "app_prod");
    }

    #[test]
    fn test_noop_cache_behind_sessions_is_rejected() {
        let err = ConfigBuilder::new()
            .with_cache_backend(CacheBackend::NoOp)
            .with_session_engine(SessionEngine::Cache)
            .build()
            .unwrap_err();
        assert!(matches!(err, MooringError::Config(_)));
    }

    #[test]
    fn test_unknown_session_cache_alias_is_rejected() {
        let session = SessionConfig {
            cache_alias: "secondary".to_string(),
            ..Default::default()
        };
        let err = ConfigBuilder::new().with_session(session).build().unwrap_err();
        assert!(matches!(err, MooringError::Config(_)));
    }

    #[test]
    fn test_whitespace_key_prefix_is_rejected() {
        let err = ConfigBuilder::new()
            .with_key_prefix("app prod")
            .build()
            .unwrap_err();
        assert!(matches!(err, MooringError::Config(_)));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let err = ConfigBuilder::new()
            .with_log_level("verbose")
            .build()
            .unwrap_err();
        assert!(matches!(err, MooringError::Config(_)));
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        let mut cache = CacheConfig::default();
        cache.redis.read_timeout_seconds = 0;
        let err = ConfigBuilder::new().with_cache(cache).build().unwrap_err();
        assert!(matches!(err, MooringError::Config(_)));
    }
}
