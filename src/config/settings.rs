use log::{info, warn};
use std::collections::HashMap;
use std::env;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub redis_default_ttl_secs: u64,
    pub source_cache_ttl_secs: Option<HashMap<String, u64>>,
    pub news_sources: Vec<String>,
    pub hotlist_api_base: String,
    pub weather_api_base: String,
    pub weather_city: String,
    pub rates_api_base: String,
    pub rates_base_currency: String,
    pub refresh_interval_secs: u64,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            redis_default_ttl_secs: env::var("REDIS_DEFAULT_TTL_SECS")
                .unwrap_or_else(|_| "180".to_string())
                .parse()
                .unwrap_or(180),
            source_cache_ttl_secs: env::var("SOURCE_CACHE_TTL_SECS").ok().map(|s| {
                s.split(',')
                    .filter_map(|part| {
                        let mut kv = part.split(':');
                        let key = kv.next()?.trim().to_string();
                        let value = kv.next()?.trim().parse::<u64>().ok()?;
                        Some((key, value))
                    })
                    .collect()
            }),
            news_sources: env::var("NEWS_SOURCES")
                .unwrap_or_else(|_| "zhihu,weibo,xueqiu,36kr".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            hotlist_api_base: env::var("HOTLIST_API_BASE")
                .unwrap_or_else(|_| "https://api-hot.imsyy.top".to_string()),
            weather_api_base: env::var("WEATHER_API_BASE")
                .unwrap_or_else(|_| "https://wttr.in".to_string()),
            weather_city: env::var("WEATHER_CITY").unwrap_or_else(|_| "Shanghai".to_string()),
            rates_api_base: env::var("RATES_API_BASE")
                .unwrap_or_else(|_| "https://open.er-api.com/v6".to_string()),
            rates_base_currency: env::var("RATES_BASE_CURRENCY")
                .unwrap_or_else(|_| "CNY".to_string()),
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap_or(120),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }

    /// TTL for a given source: per-source override from config, else the
    /// fetch-layer default handled by the cache itself.
    pub fn ttl_for_source(&self, source_id: &str) -> Option<u64> {
        self.source_cache_ttl_secs
            .as_ref()
            .and_then(|m| m.get(source_id).copied())
    }

    pub fn validate_and_log(&self) {
        if Url::parse(&self.redis_url).is_err() {
            warn!("REDIS_URL does not parse as a URL: {}", self.redis_url);
        }
        for (name, base) in [
            ("HOTLIST_API_BASE", &self.hotlist_api_base),
            ("WEATHER_API_BASE", &self.weather_api_base),
            ("RATES_API_BASE", &self.rates_api_base),
        ] {
            if Url::parse(base).is_err() {
                warn!("{} does not parse as a URL: {}", name, base);
            }
        }
        if self.news_sources.is_empty() {
            warn!("NEWS_SOURCES is empty; the refresh loop will only warm weather and rates");
        }
        info!(
            "Config loaded: {} news sources, redis_default_ttl={}s, refresh_interval={}s",
            self.news_sources.len(),
            self.redis_default_ttl_secs,
            self.refresh_interval_secs
        );
    }
}
