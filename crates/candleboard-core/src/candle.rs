//! Candle data structures for OHLCV data.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One OHLCV candle.
///
/// `time` is the UTC open time of the candle. `traded_at` is the exchange
/// timestamp of the last trade inside the candle, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub traded_at: i64,
}

impl Candle {
    pub fn new(
        time: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        traded_at: i64,
    ) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
            traded_at,
        }
    }
}

/// Trait for types that provide OHLCV data.
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;
}

impl OHLCV for Candle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}
