use futures::future::join_all;
use log::{error, info, warn};
use std::time::{Duration, Instant};
use tomato_cache::{
    cache::WEATHER_SUMMARY_TTL_SECS, config, sources::SourceClient, utils::setup_logging, Cache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging().expect("Failed to initialize logging");
    info!("Tomato Tools cache warmer starting...");

    let app_config = config::load_config()?;
    let cache = Cache::connect(&app_config.redis_url, app_config.redis_default_ttl_secs).await?;
    let sources = SourceClient::new(&app_config)?;

    loop {
        let cycle_start = Instant::now();

        // Hotlist boards refresh concurrently; each one goes through the
        // cache so a warm entry costs a single Redis round trip.
        let hotlist_fetches = app_config.news_sources.iter().map(|source_id| {
            let cache = cache.clone();
            let sources = sources.clone();
            let ttl = app_config.ttl_for_source(source_id);
            async move {
                let result = cache
                    .fetch_with_cache(
                        source_id,
                        || async { sources.fetch_hotlist(source_id).await },
                        ttl,
                    )
                    .await;
                (source_id.as_str(), result)
            }
        });

        let mut warmed = 0usize;
        let mut failed = 0usize;
        for (source_id, result) in join_all(hotlist_fetches).await {
            match result {
                Ok(_) => warmed += 1,
                Err(e) => {
                    failed += 1;
                    warn!("Hotlist '{}' refresh failed: {:#}", source_id, e);
                }
            }
        }

        let weather_ttl = app_config
            .ttl_for_source("weather-summary")
            .unwrap_or(WEATHER_SUMMARY_TTL_SECS);
        if let Err(e) = cache
            .fetch_with_cache(
                "weather-summary",
                || async {
                    sources
                        .fetch_weather_summary(&app_config.weather_city)
                        .await
                },
                Some(weather_ttl),
            )
            .await
        {
            warn!("Weather summary refresh failed: {:#}", e);
        } else {
            warmed += 1;
        }

        if let Err(e) = cache
            .fetch_with_cache(
                "exchange-rates",
                || async {
                    sources
                        .fetch_exchange_rates(&app_config.rates_base_currency)
                        .await
                },
                app_config.ttl_for_source("exchange-rates"),
            )
            .await
        {
            warn!("Exchange rates refresh failed: {:#}", e);
        } else {
            warmed += 1;
        }

        if warmed == 0 {
            error!("Every source failed this cycle; upstreams may be down");
        }
        info!(
            "Cycle complete in {:?}: {} sources warm, {} failed. Sleeping {}s...",
            cycle_start.elapsed(),
            warmed,
            failed,
            app_config.refresh_interval_secs
        );
        tokio::time::sleep(Duration::from_secs(app_config.refresh_interval_secs)).await;
    }
}
