pub mod cache;
pub mod config;
pub mod error;
pub mod sources;
pub mod utils;

pub use cache::store::{CacheStore, MemoryStore, RedisStore};
pub use cache::{
    Cache, CacheLookup, DEFAULT_FETCH_TTL_SECS, GENERIC_CACHE_TTL_SECS, WEATHER_SUMMARY_TTL_SECS,
};
pub use error::CacheError;
