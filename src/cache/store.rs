//! Pluggable key-value backends for the cache layer.

use crate::error::CacheError;
use anyhow::{anyhow, Result as AnyhowResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use log::{debug, error, info};
use redis::{aio::ConnectionManager, AsyncCommands};

/// Minimal surface the cache layer needs from a remote store: GET and SETEX.
/// Expiry enforcement belongs to the store, not to the cache layer.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError>;
}

/// Redis-backed store. Uses a `ConnectionManager` for automatic reconnection
/// and resilience; cloning the manager is cheap and yields a usable handle.
#[derive(Clone)]
pub struct RedisStore {
    conn_manager: ConnectionManager,
    redis_url: String,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("redis_url", &self.redis_url)
            .field("conn_manager", &"<ConnectionManager instance>")
            .finish()
    }
}

impl RedisStore {
    pub async fn new(redis_url: &str) -> AnyhowResult<Self> {
        info!("Initializing Redis connection manager for URL: {}", redis_url);
        let client = redis::Client::open(redis_url)?;
        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to create Redis ConnectionManager: {}", e);
            anyhow!("Failed to create Redis ConnectionManager: {}", e)
        })?;
        info!("Redis ConnectionManager initialized successfully.");
        Ok(Self {
            conn_manager,
            redis_url: redis_url.to_string(),
        })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn_manager.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::StoreError(format!("Redis GET error for key {}: {}", key, e)))
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut conn = self.conn_manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(|e| {
                CacheError::StoreError(format!("Redis SETEX error for key {}: {}", key, e))
            })
    }
}

#[derive(Clone, Debug)]
struct MemoryEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl MemoryEntry {
    fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// In-process store with the same TTL semantics as Redis. Used by tests and
/// local development when no Redis instance is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, MemoryEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            // Lazy expiry: the read guard is released before the removal,
            // otherwise the shard lock would deadlock.
            self.entries.remove(key);
            debug!("MemoryStore entry expired for key: {}", key);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                value,
                expires_at: Utc::now() + Duration::seconds(ttl_seconds as i64),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        store
            .set_ex("news:zhihu", "[1,2,3]".to_string(), 60)
            .await
            .unwrap();
        assert_eq!(
            store.get("news:zhihu").await.unwrap(),
            Some("[1,2,3]".to_string())
        );
        assert_eq!(store.get("news:weibo").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_expires_entries() {
        let store = MemoryStore::new();
        store
            .set_ex("news:zhihu", "stale".to_string(), 0)
            .await
            .unwrap();
        // TTL of zero expires immediately; the read path must treat it as absent.
        assert_eq!(store.get("news:zhihu").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn memory_store_overwrites_on_second_set() {
        let store = MemoryStore::new();
        store
            .set_ex("news:xueqiu", "old".to_string(), 60)
            .await
            .unwrap();
        store
            .set_ex("news:xueqiu", "new".to_string(), 60)
            .await
            .unwrap();
        assert_eq!(
            store.get("news:xueqiu").await.unwrap(),
            Some("new".to_string())
        );
        assert_eq!(store.len(), 1);
    }
}
