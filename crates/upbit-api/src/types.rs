//! Response types for the Upbit quotation endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One entry from the market catalog (`/v1/market/all`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketInfo {
    /// Market code (e.g., "KRW-BTC").
    pub market: String,
    /// Korean display name.
    pub korean_name: String,
    /// English display name.
    pub english_name: String,
}

/// One candle from the candle endpoints.
///
/// Upbit returns candle times as naive ISO strings without an offset; the
/// UTC field is the canonical one, the KST field is for display only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CandleTick {
    /// Market code.
    pub market: String,
    /// Candle open time in UTC.
    pub candle_date_time_utc: NaiveDateTime,
    /// Candle open time in KST.
    pub candle_date_time_kst: NaiveDateTime,
    /// Opening price.
    pub opening_price: f64,
    /// High price.
    pub high_price: f64,
    /// Low price.
    pub low_price: f64,
    /// Closing (trade) price.
    pub trade_price: f64,
    /// Timestamp of the last tick in the candle, in milliseconds.
    pub timestamp: i64,
    /// Accumulated trade price (quote volume).
    pub candle_acc_trade_price: f64,
    /// Accumulated trade volume (base volume).
    pub candle_acc_trade_volume: f64,
    /// Minute unit; only present on minute candles.
    #[serde(default)]
    pub unit: Option<u32>,
    /// First day of the period; only present on week candles.
    #[serde(default)]
    pub first_day_of_period: Option<String>,
}

/// Candle resolution, mapped to the URL path of the candle endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandleInterval {
    /// 1-minute candles
    Minutes1,
    /// 3-minute candles
    Minutes3,
    /// 5-minute candles
    Minutes5,
    /// 10-minute candles
    Minutes10,
    /// 15-minute candles
    Minutes15,
    /// 30-minute candles
    Minutes30,
    /// 60-minute candles
    Minutes60,
    /// 240-minute candles
    Minutes240,
    /// Daily candles
    Days,
    /// Weekly candles
    Weeks,
}

impl CandleInterval {
    /// Returns the path segment under `/v1/candles/`.
    pub fn path(&self) -> &'static str {
        match self {
            CandleInterval::Minutes1 => "minutes/1",
            CandleInterval::Minutes3 => "minutes/3",
            CandleInterval::Minutes5 => "minutes/5",
            CandleInterval::Minutes10 => "minutes/10",
            CandleInterval::Minutes15 => "minutes/15",
            CandleInterval::Minutes30 => "minutes/30",
            CandleInterval::Minutes60 => "minutes/60",
            CandleInterval::Minutes240 => "minutes/240",
            CandleInterval::Days => "days",
            CandleInterval::Weeks => "weeks",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_paths() {
        assert_eq!(CandleInterval::Minutes1.path(), "minutes/1");
        assert_eq!(CandleInterval::Minutes240.path(), "minutes/240");
        assert_eq!(CandleInterval::Days.path(), "days");
        assert_eq!(CandleInterval::Weeks.path(), "weeks");
    }

    #[test]
    fn test_deserialize_market_info() {
        let json = r#"[
            {"market":"KRW-BTC","korean_name":"비트코인","english_name":"Bitcoin"},
            {"market":"KRW-ETH","korean_name":"이더리움","english_name":"Ethereum"}
        ]"#;

        let markets: Vec<MarketInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].market, "KRW-BTC");
        assert_eq!(markets[1].english_name, "Ethereum");
    }

    #[test]
    fn test_deserialize_minute_candle() {
        let json = r#"{
            "market": "KRW-BTC",
            "candle_date_time_utc": "2023-01-01T00:01:00",
            "candle_date_time_kst": "2023-01-01T09:01:00",
            "opening_price": 20700000.0,
            "high_price": 20712000.0,
            "low_price": 20698000.0,
            "trade_price": 20705000.0,
            "timestamp": 1672531319559,
            "candle_acc_trade_price": 33590726.8,
            "candle_acc_trade_volume": 1.62,
            "unit": 1
        }"#;

        let tick: CandleTick = serde_json::from_str(json).unwrap();
        assert_eq!(tick.market, "KRW-BTC");
        assert_eq!(tick.unit, Some(1));
        assert_eq!(tick.trade_price, 20705000.0);
        assert_eq!(
            tick.candle_date_time_utc.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "2023-01-01T00:01:00"
        );
    }

    #[test]
    fn test_deserialize_day_candle_ignores_extras() {
        // Day candles carry change fields the client does not model.
        let json = r#"{
            "market": "KRW-BTC",
            "candle_date_time_utc": "2023-01-01T00:00:00",
            "candle_date_time_kst": "2023-01-01T09:00:00",
            "opening_price": 20690000.0,
            "high_price": 20800000.0,
            "low_price": 20600000.0,
            "trade_price": 20750000.0,
            "timestamp": 1672617599999,
            "candle_acc_trade_price": 35104407470.4,
            "candle_acc_trade_volume": 1697.04,
            "prev_closing_price": 20690000.0,
            "change_price": 60000.0,
            "change_rate": 0.0029
        }"#;

        let tick: CandleTick = serde_json::from_str(json).unwrap();
        assert_eq!(tick.unit, None);
        assert_eq!(tick.candle_acc_trade_volume, 1697.04);
    }
}
