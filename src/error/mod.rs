use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// Redis/transport failures talking to the remote store
    #[error("Store Error: {0}")]
    StoreError(String),

    /// Payload could not be serialized or deserialized
    #[error("Parse Error: {0}")]
    ParseError(String),

    /// Configuration errors
    #[error("Config Error: {0}")]
    ConfigError(String),

    /// Upstream data source (news/weather/rates API) failures
    #[error("Upstream Error: {0}")]
    UpstreamError(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::ParseError(format!("JSON serialization/deserialization error: {}", err))
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::StoreError(format!("Redis error: {}", err))
    }
}

impl From<anyhow::Error> for CacheError {
    fn from(err: anyhow::Error) -> Self {
        CacheError::UpstreamError(format!("{}", err))
    }
}

impl CacheError {
    /// Determines if an error is recoverable through retry
    pub fn is_recoverable(&self) -> bool {
        match self {
            CacheError::StoreError(_) => true,    // Redis might recover
            CacheError::ParseError(_) => false,   // Data format issues aren't recoverable
            CacheError::ConfigError(_) => false,  // Config needs fixing
            CacheError::UpstreamError(_) => true, // APIs are usually back after a while
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
