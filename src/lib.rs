//! Mooring - cache and session backend configuration for web services
//!
//! Mooring gives an application a typed, validated, environment-driven
//! configuration layer for its cache backend and session storage, plus
//! the wiring that turns the selected configuration into working
//! handles.
//!
//! # Backends
//!
//! - **Cache**: a remote Redis service for production (connection URL
//!   from `REDIS_URL`, key prefix, socket timeouts, retry-on-timeout,
//!   bounded connections) or an in-process local-memory cache as the
//!   temporary fallback.
//! - **Sessions**: stored in the configured cache, or in the
//!   application database when no cache service should hold them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mooring::{ConfigBuilder, cache, session};
//!
//! #[tokio::main]
//! async fn main() -> mooring::Result<()> {
//!     mooring::init_tracing();
//!
//!     let config = ConfigBuilder::new().from_env().build()?;
//!
//!     let cache = cache::from_config(&config.cache)?;
//!     let sessions = session::from_config(&config.session, &config.cache)?;
//!     # let _ = (cache, sessions);
//!     Ok(())
//! }
//! ```

#![allow(async_fn_in_trait)] // async_trait macro handles Send/Sync bounds properly

pub mod cache;
mod config;
mod error;
pub mod session;
pub mod traits;
pub mod utils;

// Re-exports for public API
pub use cache::{CacheBackend, CacheConfig, LocalMemoryCache, NoOpCache, RedisOptions, RedisProtocol};
#[cfg(feature = "cache-redis")]
pub use cache::RedisCache;
pub use config::{Config, ConfigBuilder, LoggingConfig};
pub use error::{ErrorContext, ErrorWithContext, MooringError, Result};
pub use session::{CacheSessionStore, SessionConfig, SessionEngine};
#[cfg(feature = "sessions-db")]
pub use session::DatabaseSessionStore;
pub use traits::cache::{Cache, CacheExt};
pub use traits::session::{SessionData, SessionStore};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// Call early in your application, typically in main().
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "mooring=debug")
/// - `MOORING_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("MOORING_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
