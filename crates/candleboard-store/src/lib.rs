//! Flat-file candle cache for candleboard.
//!
//! Candles are persisted as chunked CSV files under
//! `<root>/<market>/<period>/`, one file per contiguous range, named
//! `<start> - <end>.csv` by the ISO timestamps of the chunk's first and
//! last candle. File names sort chronologically, so directory order is
//! history order.

mod range;
pub mod store;

use thiserror::Error;

pub use store::{CandleStore, RangeTail, CHUNK_SIZE};

/// Cache store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed range file name: {0}")]
    BadRangeName(String),
}
