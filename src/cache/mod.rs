//! Cache-aside layer for upstream API responses (hotlists, weather, rates).
//!
//! The cache is a best-effort speed-up only: store faults degrade to a miss on
//! read and a dropped write on the write path, and never fail the caller.
//! Producer faults are the caller's concern and propagate unchanged.

pub mod store;

use crate::cache::store::{CacheStore, RedisStore};
use crate::error::CacheError;
use anyhow::Result as AnyhowResult;
use log::{debug, error, warn};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;

/// TTL for the generic content cache.
pub const GENERIC_CACHE_TTL_SECS: u64 = 180;
/// TTL for the AI weather summary, which only changes a few times a day.
pub const WEATHER_SUMMARY_TTL_SECS: u64 = 7200;
/// TTL applied by `fetch_with_cache` when the call site passes none.
pub const DEFAULT_FETCH_TTL_SECS: u64 = 300;

/// Fixed key namespace; callers only control the `<source_id>` segment.
const KEY_PREFIX: &str = "news";

/// Outcome of a cache read. `Unavailable` means the store could not be
/// reached; the caller treats it exactly like a miss, but tests (and logs)
/// can tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
    Unavailable,
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss | CacheLookup::Unavailable => None,
        }
    }
}

/// Shared cache handle over an injected store backend. Constructed once at
/// startup and cloned into every task that needs it; no global client.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    default_ttl_secs: u64,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("default_ttl_secs", &self.default_ttl_secs)
            .field("store", &"<dyn CacheStore>")
            .finish()
    }
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>, default_ttl_secs: u64) -> Self {
        Self {
            store,
            default_ttl_secs,
        }
    }

    /// Convenience constructor wiring up the Redis backend.
    pub async fn connect(redis_url: &str, default_ttl_secs: u64) -> AnyhowResult<Self> {
        let store = RedisStore::new(redis_url).await?;
        Ok(Self::new(Arc::new(store), default_ttl_secs))
    }

    fn generate_key(source_id: &str) -> String {
        format!("{}:{}", KEY_PREFIX, source_id)
    }

    /// Looks up `key` and deserializes the stored JSON. A payload that is not
    /// valid JSON is retried as a bare string before giving up, since the
    /// store may hold an unserialized value written by an older deployment.
    /// Store faults are logged and reported as `Unavailable`, never an error.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        debug!("Attempting to GET cache for key: {}", key);
        match self.store.get(key).await {
            Ok(Some(raw)) => {
                debug!("Cache HIT for key: {}. Deserializing...", key);
                match serde_json::from_str::<T>(&raw) {
                    Ok(value) => CacheLookup::Hit(value),
                    Err(e) => {
                        warn!(
                            "Failed to deserialize cached JSON for key {}: {}. Falling back to raw string.",
                            key, e
                        );
                        match serde_json::from_value::<T>(serde_json::Value::String(raw)) {
                            Ok(value) => CacheLookup::Hit(value),
                            Err(e2) => {
                                warn!(
                                    "Raw-string fallback also failed for key {}: {}. Treating as miss.",
                                    key, e2
                                );
                                CacheLookup::Miss
                            }
                        }
                    }
                }
            }
            Ok(None) => {
                debug!("Cache MISS for key: {}", key);
                CacheLookup::Miss
            }
            Err(e) => {
                error!("Store GET error for key {}: {}", key, e);
                CacheLookup::Unavailable
            }
        }
    }

    /// Serializes `value` and writes it under `key` with the given expiry.
    /// Passing `None` uses the handle's default TTL.
    pub async fn set_ex<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        let payload = serde_json::to_string(value)?;
        let ttl_to_use = ttl_seconds.unwrap_or(self.default_ttl_secs);
        self.store.set_ex(key, payload, ttl_to_use).await?;
        debug!(
            "Cache SETEX success for key: {} with TTL: {}s",
            key, ttl_to_use
        );
        Ok(())
    }

    /// Cache-aside read-through: returns the cached value for
    /// `news:<source_id>` when fresh, otherwise invokes `producer`, writes the
    /// result back best-effort, and returns it.
    ///
    /// No request coalescing: concurrent misses for the same key each invoke
    /// the producer and both write; the last write wins. Acceptable for a
    /// content cache where a few seconds of staleness is immaterial.
    pub async fn fetch_with_cache<T, F, Fut>(
        &self,
        source_id: &str,
        producer: F,
        ttl_seconds: Option<u64>,
    ) -> AnyhowResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AnyhowResult<T>>,
    {
        let key = Self::generate_key(source_id);
        match self.get_json::<T>(&key).await {
            CacheLookup::Hit(value) => return Ok(value),
            CacheLookup::Miss => {}
            CacheLookup::Unavailable => {
                warn!("Cache unavailable for key {}; fetching live", key);
            }
        }

        let value = producer()
            .await
            .map_err(|e| e.context(format!("producer failed for source '{}'", source_id)))?;

        let ttl = ttl_seconds.unwrap_or(DEFAULT_FETCH_TTL_SECS);
        if let Err(e) = self.set_ex(&key, &value, Some(ttl)).await {
            warn!("Best-effort cache write failed for key {}: {}", key, e);
        }
        Ok(value)
    }
}
