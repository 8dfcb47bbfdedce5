use crate::cache::config::{CacheConfig, RedisProtocol};
use crate::error::{MooringError, Result};
use crate::traits::cache::Cache;
use async_trait::async_trait;
use redis::{IntoConnectionInfo, ProtocolVersion};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Redis cache implementation
///
/// Commands run over multiplexed async connections established with the
/// configured connect and read timeouts. The number of connections being
/// established or used concurrently is capped at `max_connections`, and
/// a command that fails on a timeout is retried once when
/// `retry_on_timeout` is set. All keys are namespaced with the
/// configured key prefix.
#[derive(Clone, Debug)]
pub struct RedisCache {
    client: redis::Client,
    default_ttl: Duration,
    key_prefix: String,
    connect_timeout: Duration,
    read_timeout: Duration,
    retry_on_timeout: bool,
    connection_slots: Arc<Semaphore>,
}

impl RedisCache {
    /// Create a new Redis cache from configuration
    ///
    /// Fails if no connection URL is configured or the URL does not
    /// parse.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let url = config.redis_url.as_deref().ok_or_else(|| {
            MooringError::config("Redis cache selected but no connection URL configured (set REDIS_URL)")
        })?;

        let mut info = url
            .into_connection_info()
            .map_err(|e| MooringError::config(format!("Invalid Redis URL: {}", e)))?;
        info.redis.protocol = match config.redis.protocol {
            RedisProtocol::Resp2 => ProtocolVersion::RESP2,
            RedisProtocol::Resp3 => ProtocolVersion::RESP3,
        };

        let client = redis::Client::open(info)
            .map_err(|e| MooringError::cache(format!("Failed to create Redis client: {}", e)))?;

        Ok(Self {
            client,
            default_ttl: config.default_ttl(),
            key_prefix: config.key_prefix.clone(),
            connect_timeout: config.redis.connect_timeout(),
            read_timeout: config.redis.read_timeout(),
            retry_on_timeout: config.redis.retry_on_timeout,
            connection_slots: Arc::new(Semaphore::new(config.redis.max_connections as usize)),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }

    /// Get a connection from the Redis client
    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection_with_timeouts(self.read_timeout, self.connect_timeout)
            .await
            .map_err(|e| MooringError::cache(format!("Failed to get Redis connection: {}", e)))
    }

    /// Run a command, holding a connection slot and retrying once on timeout
    async fn query<T: redis::FromRedisValue>(&self, cmd: &redis::Cmd, op: &str) -> Result<T> {
        let _slot = self
            .connection_slots
            .acquire()
            .await
            .map_err(|_| MooringError::cache("Redis connection limiter closed"))?;

        let mut conn = self.connection().await?;
        match cmd.query_async::<T>(&mut conn).await {
            Ok(value) => Ok(value),
            Err(err) if self.retry_on_timeout && err.is_timeout() => {
                tracing::debug!(op, "Redis command timed out, retrying once");
                let mut conn = self.connection().await?;
                cmd.query_async::<T>(&mut conn)
                    .await
                    .map_err(|e| MooringError::cache(format!("Redis {} failed after retry: {}", op, e)))
            }
            Err(err) => Err(MooringError::cache(format!("Redis {} failed: {}", op, err))),
        }
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(self.namespaced(key));
        self.query(&cmd, "GET").await
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let ttl_seconds = ttl.unwrap_or(self.default_ttl).as_secs();

        let mut cmd = redis::cmd("SETEX");
        cmd.arg(self.namespaced(key)).arg(ttl_seconds).arg(value);
        self.query(&cmd, "SETEX").await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(self.namespaced(key));
        self.query(&cmd, "DEL").await
    }

    async fn clear(&self) -> Result<()> {
        // Flushes the whole logical database, prefix included
        let cmd = redis::cmd("FLUSHDB");
        self.query(&cmd, "FLUSHDB").await
    }

    fn is_healthy(&self) -> bool {
        // Best effort: try to open a plain connection synchronously
        self.client.get_connection().is_ok()
    }
}
