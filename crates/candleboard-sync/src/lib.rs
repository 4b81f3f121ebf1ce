//! Candle mining for candleboard.
//!
//! This crate fetches OHLCV candles from the Upbit quotation API by paging
//! backwards from "now", resumes from the newest timestamp in the
//! flat-file cache, and keeps every (market, period) pair fresh in a
//! run-forever loop.

pub mod catalog;
pub mod fetcher;
pub mod miner;

pub use catalog::MarketCatalog;
pub use fetcher::{CandleFetcher, PAGE_SIZE};
pub use miner::Miner;
