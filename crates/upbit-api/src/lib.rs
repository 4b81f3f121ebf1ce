//! # Upbit API Client Library
//!
//! A Rust client for the Upbit public REST API (quotation endpoints).
//!
//! ## Features
//!
//! - **Market catalog**: list all tradable market codes with display names
//! - **Candles**: minute/day/week OHLCV candles with backward pagination
//! - **Rate limiting**: built-in sliding-window limiter with auto-retry on 429
//! - **Type safety**: strongly typed response models
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use upbit_api::{UpbitClient, MarketApi, CandleInterval};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), upbit_api::Error> {
//!     let client = UpbitClient::public()?;
//!     let market = MarketApi::new(client);
//!
//!     let markets = market.markets().await?;
//!     println!("{} markets", markets.len());
//!
//!     let candles = market
//!         .candles(CandleInterval::Minutes1, "KRW-BTC", 200, None)
//!         .await?;
//!     println!("newest close: {}", candles[0].trade_price);
//!
//!     Ok(())
//! }
//! ```
//!
//! Only public quotation endpoints are implemented; nothing here requires
//! an API key.

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod market;
pub mod rate_limit;
pub mod types;

// Re-exports for convenience
pub use client::UpbitClient;
pub use config::{Config, RateLimitConfig};
pub use error::{ApiError, Error, Result};
pub use market::MarketApi;
pub use types::{CandleInterval, CandleTick, MarketInfo};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL for the Upbit REST API
pub const BASE_URL: &str = "https://api.upbit.com";

/// Maximum number of candles a single request may return
pub const MAX_CANDLE_COUNT: u32 = 200;

/// Prelude module for convenient imports.
pub mod prelude {
    //! Common imports for using the Upbit API client.

    pub use crate::client::UpbitClient;
    pub use crate::config::{Config, RateLimitConfig};
    pub use crate::error::{Error, Result};
    pub use crate::market::MarketApi;
    pub use crate::types::{CandleInterval, CandleTick, MarketInfo};
}
