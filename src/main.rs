//! Candleboard miner entry point.
//!
//! Loads configuration, fetches the market catalog once, then mines every
//! (market, period) pair forever.

use std::time::Duration;

use anyhow::{Context, Result};
use candleboard_config::Config;
use candleboard_store::CandleStore;
use candleboard_sync::{CandleFetcher, MarketCatalog, Miner};
use upbit_api::{MarketApi, RateLimitConfig, UpbitClient};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load_default();
    log::info!(
        "config: data dir {}, {} target market(s)",
        config.general.data_dir.display(),
        config.general.markets.len()
    );

    let api_config = upbit_api::Config::public()
        .with_base_url(config.api.base_url.clone())
        .with_timeout(Duration::from_secs(config.api.timeout_secs))
        .with_rate_limit_config(RateLimitConfig {
            limit: config.api.requests_per_sec,
            ..Default::default()
        });

    let client = UpbitClient::new(api_config).context("Failed to create Upbit client")?;
    let api = MarketApi::new(client);

    let catalog = MarketCatalog::fetch(&api).await?;
    let fetcher = CandleFetcher::new(
        api,
        config.miner.page_delay_ms,
        config.miner.retry_delay_ms,
    );
    let store = CandleStore::with_chunk_size(&config.general.data_dir, config.miner.chunk_size);

    let miner = Miner::new(
        catalog,
        fetcher,
        store,
        config.general.markets.clone(),
        config.miner.task_delay_ms,
    )?;

    miner.run().await
}
