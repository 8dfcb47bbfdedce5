//! End-to-end session storage through a configured cache backend

use mooring::{CacheConfig, SessionConfig, SessionData, SessionStore, session};
use std::time::Duration;

#[tokio::test]
async fn sessions_roundtrip_through_the_configured_cache() {
    let store = session::from_config(&SessionConfig::default(), &CacheConfig::default()).unwrap();

    let mut data = SessionData::new(Duration::from_secs(3600));
    data.set("user_id".to_string(), "42".to_string());
    data.set("locale".to_string(), "en".to_string());

    store.save("sess-abc", data).await.unwrap();

    let loaded = store.load("sess-abc").await.unwrap().unwrap();
    assert_eq!(loaded.get("user_id"), Some(&"42".to_string()));
    assert_eq!(loaded.get("locale"), Some(&"en".to_string()));

    store.delete("sess-abc").await.unwrap();
    assert!(store.load("sess-abc").await.unwrap().is_none());
}

#[tokio::test]
async fn extending_a_session_keeps_it_alive() {
    let store = session::from_config(&SessionConfig::default(), &CacheConfig::default()).unwrap();

    let mut data = SessionData::new(Duration::from_secs(1));
    data.set("k".to_string(), "v".to_string());
    data.extend(Duration::from_secs(3600));

    store.save("sess-abc", data).await.unwrap();

    let loaded = store.load("sess-abc").await.unwrap().unwrap();
    assert!(!loaded.is_expired());
    assert!(loaded.remaining_ttl().unwrap() > Duration::from_secs(3000));
}

#[tokio::test]
async fn cache_store_delegates_expiry_to_the_backend() {
    let store = session::from_config(&SessionConfig::default(), &CacheConfig::default()).unwrap();

    // Nothing to prune, the cache TTL handles expiry
    assert_eq!(store.cleanup_expired().await.unwrap(), 0);
    assert!(store.is_healthy());
}
