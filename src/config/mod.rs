pub mod env;
pub mod settings;

pub use settings::Config;

use crate::error::CacheError;
use std::sync::Arc;

/// Loads and returns the application configuration as an `Arc<Config>`.
pub fn load_config() -> Result<Arc<settings::Config>, CacheError> {
    dotenv::dotenv().ok(); // Load .env file if present, ignore errors

    env::check_and_print_env_vars();
    let config = settings::Config::from_env();

    if config.redis_url.is_empty() {
        return Err(CacheError::ConfigError(
            "REDIS_URL cannot be empty".to_string(),
        ));
    }
    if config.hotlist_api_base.is_empty() {
        return Err(CacheError::ConfigError(
            "HOTLIST_API_BASE cannot be empty".to_string(),
        ));
    }

    config.validate_and_log();
    Ok(Arc::new(config))
}
