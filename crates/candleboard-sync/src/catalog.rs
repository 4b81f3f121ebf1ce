//! Market and period catalog.

use anyhow::{bail, Context, Result};
use candleboard_core::Period;
use upbit_api::{MarketApi, MarketInfo};

/// The set of markets known to the exchange, fetched once per run.
///
/// Periods are a fixed enumeration and need no fetching; see
/// [`MarketCatalog::periods`].
#[derive(Debug, Clone)]
pub struct MarketCatalog {
    markets: Vec<MarketInfo>,
}

impl MarketCatalog {
    /// Fetch the catalog from the exchange.
    pub async fn fetch(api: &MarketApi) -> Result<Self> {
        let markets = api
            .markets()
            .await
            .context("Failed to fetch market catalog")?;

        log::info!("market catalog: {} markets", markets.len());
        Ok(Self { markets })
    }

    /// Build a catalog from an already known market list.
    pub fn from_markets(markets: Vec<MarketInfo>) -> Self {
        Self { markets }
    }

    /// All known markets.
    pub fn markets(&self) -> &[MarketInfo] {
        &self.markets
    }

    /// All known market codes.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.markets.iter().map(|m| m.market.as_str())
    }

    /// Whether the catalog contains the given market code.
    pub fn contains(&self, code: &str) -> bool {
        self.markets.iter().any(|m| m.market == code)
    }

    /// Reject unknown market codes before any candle request goes out.
    pub fn ensure_market(&self, code: &str) -> Result<()> {
        if !self.contains(code) {
            bail!("Market {code} is not available");
        }
        Ok(())
    }

    /// All supported candle periods, in mining order.
    pub fn periods() -> &'static [Period] {
        Period::all()
    }
}
