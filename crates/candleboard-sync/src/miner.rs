//! Run-forever candle miner.

use std::time::Duration;

use anyhow::Result;
use candleboard_core::Period;
use candleboard_store::CandleStore;

use crate::catalog::MarketCatalog;
use crate::fetcher::CandleFetcher;

/// Walks the (market, period) product forever, keeping the cache fresh.
pub struct Miner {
    catalog: MarketCatalog,
    fetcher: CandleFetcher,
    store: CandleStore,
    markets: Vec<String>,
    task_delay_ms: u64,
}

impl Miner {
    /// Create a miner.
    ///
    /// An empty `markets` list means every market in the catalog; a
    /// non-empty list is validated against the catalog up front.
    pub fn new(
        catalog: MarketCatalog,
        fetcher: CandleFetcher,
        store: CandleStore,
        markets: Vec<String>,
        task_delay_ms: u64,
    ) -> Result<Self> {
        let markets = if markets.is_empty() {
            catalog.codes().map(str::to_string).collect()
        } else {
            for market in &markets {
                catalog.ensure_market(market)?;
            }
            markets
        };

        Ok(Self {
            catalog,
            fetcher,
            store,
            markets,
            task_delay_ms,
        })
    }

    /// The markets this miner walks.
    pub fn markets(&self) -> &[String] {
        &self.markets
    }

    /// Update one (market, period) pair.
    ///
    /// Resumes from the newest cached timestamp, fetches everything newer,
    /// merges with the cached tail and rewrites it. Returns the number of
    /// new candles.
    pub async fn update(&self, market: &str, period: Period) -> Result<usize> {
        self.catalog.ensure_market(market)?;

        let (mut merged, since) = match self.store.latest_range(market, period)? {
            Some(tail) => {
                let since = tail.newest;
                (tail.candles, Some(since))
            }
            None => (Vec::new(), None),
        };

        let fresh = self.fetcher.fetch_since(market, period, since).await?;
        if fresh.is_empty() {
            log::debug!("{market} {period}: up to date");
            return Ok(0);
        }

        let count = fresh.len();
        merged.extend(fresh);
        self.store.replace_tail(market, period, &merged)?;

        log::info!("{market} {period}: {count} new candles");
        Ok(count)
    }

    /// Mine every (market, period) pair, forever.
    ///
    /// A failed pair is logged and skipped; the loop keeps going.
    pub async fn run(&self) -> Result<()> {
        eprintln!(
            "[miner] starting: {} markets x {} periods, data dir {}",
            self.markets.len(),
            Period::all().len(),
            self.store.root().display()
        );

        loop {
            for market in &self.markets {
                for &period in Period::all() {
                    match self.update(market, period).await {
                        Ok(0) => {}
                        Ok(count) => eprintln!("[miner] {market} {period}: +{count} candles"),
                        Err(e) => log::error!("{market} {period}: update failed: {e:#}"),
                    }

                    if self.task_delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.task_delay_ms)).await;
                    }
                }
            }
        }
    }
}
