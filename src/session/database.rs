//! Database-backed session store
//!
//! Persists sessions in a `sessions` table. The fallback engine when no
//! cache service is available to hold session state.

use crate::error::{MooringError, Result};
use crate::traits::session::{SessionData, SessionStore};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::collections::HashMap;
use std::time::SystemTime;

/// Session table entity
pub mod entity {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "sessions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub session_id: String,
        /// Session payload serialized as JSON
        #[sea_orm(column_type = "Text")]
        pub data: String,
        pub created_at: DateTimeUtc,
        pub expires_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Database-backed session store
///
/// Unlike the cache-backed store, rows do not expire on their own;
/// `cleanup_expired` should run periodically to prune them.
#[derive(Clone)]
pub struct DatabaseSessionStore {
    db: DatabaseConnection,
}

impl DatabaseSessionStore {
    /// Create a session store on top of an application database
    ///
    /// Expects the `sessions` table to exist (session_id text primary
    /// key, data text, created_at and expires_at timestamps).
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Verify database connectivity
    pub async fn ping(&self) -> Result<()> {
        self.db.ping().await.map_err(Into::into)
    }
}

#[async_trait]
impl SessionStore for DatabaseSessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<SessionData>> {
        let Some(row) = entity::Entity::find_by_id(session_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let expires_at: SystemTime = row.expires_at.into();
        if SystemTime::now() > expires_at {
            entity::Entity::delete_by_id(session_id.to_string())
                .exec(&self.db)
                .await?;
            return Ok(None);
        }

        let data: HashMap<String, String> = serde_json::from_str(&row.data)
            .map_err(|e| MooringError::session(format!("Failed to deserialize session: {}", e)))?;

        Ok(Some(SessionData {
            data,
            created_at: row.created_at.into(),
            expires_at,
        }))
    }

    async fn save(&self, session_id: &str, data: SessionData) -> Result<()> {
        if data.is_expired() {
            return Err(MooringError::session(format!(
                "Refusing to save expired session {}",
                session_id
            )));
        }

        let payload = serde_json::to_string(&data.data)
            .map_err(|e| MooringError::session(format!("Failed to serialize session: {}", e)))?;

        // Upsert as delete-then-insert; sessions are single-writer per id
        entity::Entity::delete_by_id(session_id.to_string())
            .exec(&self.db)
            .await?;

        entity::ActiveModel {
            session_id: Set(session_id.to_string()),
            data: Set(payload),
            created_at: Set(data.created_at.into()),
            expires_at: Set(data.expires_at.into()),
        }
        .insert(&self.db)
        .await?;

        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        entity::Entity::delete_by_id(session_id.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let result = entity::Entity::delete_many()
            .filter(entity::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::debug!(removed = result.rows_affected, "Pruned expired sessions");
        }

        Ok(result.rows_affected as usize)
    }

    fn is_healthy(&self) -> bool {
        // No synchronous probe on the connection; failures surface from
        // the async operations. Use `ping` for an explicit check.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Database};
    use std::time::Duration;

    async fn store() -> DatabaseSessionStore {
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
        DatabaseSessionStore::new(db)
    }

    #[tokio::test]
    async fn test_load_save() {
        let store = store().await;
        let mut session = SessionData::new(Duration::from_secs(3600));
        session.set("user_id".to_string(), "123".to_string());

        store.save("sess-1", session).await.unwrap();

        let loaded = store.load("sess-1").await.unwrap().unwrap();
        assert_eq!(loaded.get("user_id"), Some(&"123".to_string()));
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_session() {
        let store = store().await;

        let mut first = SessionData::new(Duration::from_secs(3600));
        first.set("k".to_string(), "old".to_string());
        store.save("sess-1", first).await.unwrap();

        let mut second = SessionData::new(Duration::from_secs(3600));
        second.set("k".to_string(), "new".to_string());
        store.save("sess-1", second).await.unwrap();

        let loaded = store.load("sess-1").await.unwrap().unwrap();
        assert_eq!(loaded.get("k"), Some(&"new".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store().await;
        store
            .save("sess-1", SessionData::new(Duration::from_secs(3600)))
            .await
            .unwrap();
        store.delete("sess-1").await.unwrap();

        assert!(store.load("sess-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_loads_as_none_and_is_removed() {
        let store = store().await;
        let mut session = SessionData::new(Duration::from_secs(3600));
        session.expires_at = SystemTime::now() - Duration::from_secs(1);

        // Insert the expired row directly, save() refuses them
        entity::ActiveModel {
            session_id: Set("sess-1".to_string()),
            data: Set("{}".to_string()),
            created_at: Set(session.created_at.into()),
            expires_at: Set(session.expires_at.into()),
        }
        .insert(&store.db)
        .await
        .unwrap();

        assert!(store.load("sess-1").await.unwrap().is_none());

        // Row was pruned on load
        let row = entity::Entity::find_by_id("sess-1".to_string())
            .one(&store.db)
            .await
            .unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = store().await;

        entity::ActiveModel {
            session_id: Set("expired".to_string()),
            data: Set("{}".to_string()),
            created_at: Set(Utc::now()),
            expires_at: Set(Utc::now() - chrono::Duration::seconds(10)),
        }
        .insert(&store.db)
        .await
        .unwrap();

        store
            .save("valid", SessionData::new(Duration::from_secs(3600)))
            .await
            .unwrap();

        let removed = store.cleanup_expired().await.unwrap();
        assert_eq!(removed, 1);

        assert!(store.load("expired").await.unwrap().is_none());
        assert!(store.load("valid").await.unwrap().is_some());
    }
}
