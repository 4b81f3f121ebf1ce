//! Quotation endpoints: market catalog and candles.

use std::collections::HashMap;

use crate::client::UpbitClient;
use crate::error::{Error, Result};
use crate::rate_limit::EndpointWeight;
use crate::types::{CandleInterval, CandleTick, MarketInfo};

/// Market data API.
#[derive(Debug, Clone)]
pub struct MarketApi {
    client: UpbitClient,
}

impl MarketApi {
    /// Create a new Market API instance.
    pub fn new(client: UpbitClient) -> Self {
        Self { client }
    }

    /// Get the full market catalog.
    ///
    /// # Example
    /// ```ignore
    /// let client = UpbitClient::public()?;
    /// let market = MarketApi::new(client);
    /// let markets = market.markets().await?;
    /// ```
    pub async fn markets(&self) -> Result<Vec<MarketInfo>> {
        let mut params = HashMap::new();
        params.insert("is_details".to_string(), "false".to_string());

        self.client
            .get("/market/all", Some(params), EndpointWeight::MARKET_ALL)
            .await
    }

    /// Get candles for a market, newest first.
    ///
    /// # Arguments
    /// * `interval` - Candle resolution
    /// * `market` - Market code (e.g., "KRW-BTC")
    /// * `count` - Number of candles (max 200)
    /// * `to` - Exclusive upper bound as "YYYY-MM-DD HH:MM:SS" UTC; `None`
    ///   means the most recent candles
    pub async fn candles(
        &self,
        interval: CandleInterval,
        market: &str,
        count: u32,
        to: Option<&str>,
    ) -> Result<Vec<CandleTick>> {
        if count == 0 || count > crate::MAX_CANDLE_COUNT {
            return Err(Error::InvalidParameter(format!(
                "count must be 1..={}, got {count}",
                crate::MAX_CANDLE_COUNT
            )));
        }

        let mut params = HashMap::new();
        params.insert("market".to_string(), market.to_uppercase());
        params.insert("count".to_string(), count.to_string());

        if let Some(to) = to {
            params.insert("to".to_string(), to.to_string());
        }

        let endpoint = format!("/candles/{}", interval.path());

        self.client
            .get(&endpoint, Some(params), EndpointWeight::CANDLES)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::UpbitClient;

    #[tokio::test]
    async fn test_candles_rejects_oversized_count() {
        let client = UpbitClient::public().unwrap();
        let market = MarketApi::new(client);

        let result = market
            .candles(CandleInterval::Minutes1, "KRW-BTC", 500, None)
            .await;

        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn test_candles_rejects_zero_count() {
        let client = UpbitClient::public().unwrap();
        let market = MarketApi::new(client);

        let result = market
            .candles(CandleInterval::Days, "KRW-BTC", 0, None)
            .await;

        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }
}
