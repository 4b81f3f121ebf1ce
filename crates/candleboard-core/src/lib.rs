//! Core types for candleboard.

pub mod candle;
pub mod period;

pub use candle::{Candle, OHLCV};
pub use period::Period;
