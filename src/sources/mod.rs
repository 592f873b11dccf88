//! Upstream data sources for the aggregator: trending-news hotlists, a
//! weather summary, and currency exchange rates. These are the producers
//! handed to the cache layer; their failures propagate to the caller
//! untouched, the cache never masks an upstream outage with an error of its
//! own.

use crate::config::settings::Config;
use anyhow::{anyhow, Result as AnyhowResult};
use log::info;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// HTTP client over the third-party content APIs.
#[derive(Debug, Clone)]
pub struct SourceClient {
    http: reqwest::Client,
    hotlist_api_base: String,
    weather_api_base: String,
    rates_api_base: String,
}

impl SourceClient {
    pub fn new(config: &Config) -> AnyhowResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            http,
            hotlist_api_base: config.hotlist_api_base.clone(),
            weather_api_base: config.weather_api_base.clone(),
            rates_api_base: config.rates_api_base.clone(),
        })
    }

    async fn get_json(&self, url: Url) -> AnyhowResult<Value> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Request to {} failed: {}", url, e))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Upstream {} returned status: {}",
                url,
                response.status()
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| anyhow!("Failed to parse response from {}: {}", url, e))
    }

    /// Fetches the trending list for one board (zhihu, weibo, xueqiu, ...).
    pub async fn fetch_hotlist(&self, source_id: &str) -> AnyhowResult<Value> {
        let url = hotlist_url(&self.hotlist_api_base, source_id)?;
        info!("Fetching hotlist '{}' from {}", source_id, url);
        self.get_json(url).await
    }

    /// Fetches the current weather summary for a city.
    pub async fn fetch_weather_summary(&self, city: &str) -> AnyhowResult<Value> {
        let mut url = Url::parse(&self.weather_api_base)
            .map_err(|e| anyhow!("Invalid weather API base: {}", e))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Weather API base is not a valid HTTP base URL"))?
            .pop_if_empty()
            .push(city);
        url.query_pairs_mut().append_pair("format", "j1");
        info!("Fetching weather summary for '{}' from {}", city, url);
        self.get_json(url).await
    }

    /// Fetches exchange rates against a base currency.
    pub async fn fetch_exchange_rates(&self, base_currency: &str) -> AnyhowResult<Value> {
        let mut url = Url::parse(&self.rates_api_base)
            .map_err(|e| anyhow!("Invalid rates API base: {}", e))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Rates API base is not a valid HTTP base URL"))?
            .pop_if_empty()
            .extend(["latest", base_currency]);
        info!("Fetching exchange rates for '{}' from {}", base_currency, url);
        self.get_json(url).await
    }
}

fn hotlist_url(base: &str, source_id: &str) -> AnyhowResult<Url> {
    let mut url = Url::parse(base).map_err(|e| anyhow!("Invalid hotlist API base: {}", e))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Hotlist API base is not a valid HTTP base URL"))?
        .pop_if_empty()
        .push(source_id);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hotlist_url_appends_source_segment() {
        let url = hotlist_url("https://api-hot.imsyy.top", "xueqiu").unwrap();
        assert_eq!(url.as_str(), "https://api-hot.imsyy.top/xueqiu");
    }

    #[test]
    fn hotlist_url_rejects_garbage_base() {
        assert!(hotlist_url("not a url", "zhihu").is_err());
    }
}
