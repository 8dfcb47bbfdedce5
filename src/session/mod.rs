//! Session management and storage.
//!
//! Session state persists either in the configured cache backend or in
//! the application database, selected by the session engine setting.

mod cache_store;
mod config;

#[cfg(feature = "sessions-db")]
mod database;

pub use cache_store::CacheSessionStore;
pub use config::{SessionConfig, SessionEngine};

#[cfg(feature = "sessions-db")]
pub use database::DatabaseSessionStore;

use crate::cache::CacheConfig;
use crate::error::{MooringError, Result};
use crate::traits::session::SessionStore;
use std::sync::Arc;

fn check_cache_alias(config: &SessionConfig) -> Result<()> {
    if config.cache_alias != crate::cache::DEFAULT_CACHE_ALIAS {
        return Err(MooringError::config(format!(
            "Session cache alias '{}' does not name a configured cache (expected '{}')",
            config.cache_alias,
            crate::cache::DEFAULT_CACHE_ALIAS
        )));
    }
    Ok(())
}

/// Construct the session store selected by the configuration
///
/// The cache-backed engine builds the aliased cache from `cache_config`.
/// Selecting the database engine here is a configuration error; that
/// engine needs the connection the application owns, see
/// [`from_config_with_database`].
pub fn from_config(
    config: &SessionConfig,
    cache_config: &CacheConfig,
) -> Result<Arc<dyn SessionStore>> {
    match config.engine {
        SessionEngine::Cache => {
            check_cache_alias(config)?;
            let cache = crate::cache::from_config(cache_config)?;
            tracing::info!(alias = %config.cache_alias, "Using cache-backed session storage");
            Ok(Arc::new(CacheSessionStore::new(cache)))
        }
        #[cfg(feature = "sessions-db")]
        SessionEngine::Database => Err(MooringError::config(
            "Database session engine selected but no database connection provided",
        )),
    }
}

/// Construct the session store, with a database available for the
/// database engine
///
/// The cache engine behaves exactly as in [`from_config`]; the database
/// engine wraps the given connection.
#[cfg(feature = "sessions-db")]
pub fn from_config_with_database(
    config: &SessionConfig,
    cache_config: &CacheConfig,
    db: sea_orm::DatabaseConnection,
) -> Result<Arc<dyn SessionStore>> {
    match config.engine {
        SessionEngine::Cache => from_config(config, cache_config),
        SessionEngine::Database => {
            tracing::info!("Using database-backed session storage");
            Ok(Arc::new(DatabaseSessionStore::new(db)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::session::SessionData;
    use std::time::Duration;

    #[tokio::test]
    async fn test_from_config_cache_engine() {
        let store = from_config(&SessionConfig::default(), &CacheConfig::default()).unwrap();

        store
            .save("sess-1", SessionData::new(Duration::from_secs(60)))
            .await
            .unwrap();
        assert!(store.load("sess-1").await.unwrap().is_some());
    }

    #[test]
    fn test_unknown_cache_alias_is_rejected() {
        let config = SessionConfig {
            cache_alias: "secondary".to_string(),
            ..Default::default()
        };
        let err = from_config(&config, &CacheConfig::default()).unwrap_err();
        assert!(matches!(err, MooringError::Config(_)));
    }

    #[cfg(feature = "sessions-db")]
    #[test]
    fn test_database_engine_requires_connection() {
        let config = SessionConfig {
            engine: SessionEngine::Database,
            ..Default::default()
        };
        let err = from_config(&config, &CacheConfig::default()).unwrap_err();
        assert!(matches!(err, MooringError::Config(_)));
    }

    #[cfg(feature = "sessions-db")]
    #[tokio::test]
    async fn test_from_config_with_database() {
        use sea_orm::{ConnectionTrait, Database};

        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.execute_unprepared(
            "CREATE TABLE sessions (
                session_id TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )",
        )
        .await
        .unwrap();

        let config = SessionConfig {
            engine: SessionEngine::Database,
            ..Default::default()
        };
        let store = from_config_with_database(&config, &CacheConfig::default(), db).unwrap();

        store
            .save("sess-1", SessionData::new(Duration::from_secs(60)))
            .await
            .unwrap();
        assert!(store.load("sess-1").await.unwrap().is_some());
    }
}
