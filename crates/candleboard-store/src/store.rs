//! Chunked flat-file candle store.

use std::fs;
use std::path::{Path, PathBuf};

use candleboard_core::{Candle, Period};
use chrono::NaiveDateTime;

use crate::range::{parse_range_file_name, range_file_name, read_chunk, write_chunk};
use crate::StoreError;

/// Default number of candles per chunk file.
pub const CHUNK_SIZE: usize = 10_000;

/// The most recent cached range for a (market, period) pair.
#[derive(Debug, Clone)]
pub struct RangeTail {
    /// Candles of the newest range file, ascending.
    pub candles: Vec<Candle>,
    /// Open time of the newest cached candle; resume fetching from here.
    pub newest: NaiveDateTime,
}

/// Flat-file candle cache rooted at a data directory.
///
/// One directory per (market, period), one CSV file per contiguous chunk
/// of up to `chunk_size` candles. The newest chunk is treated as
/// provisional: its last candle may not have been closed when it was
/// written, so [`CandleStore::replace_tail`] always deletes it and
/// rewrites from its start.
#[derive(Debug, Clone)]
pub struct CandleStore {
    root: PathBuf,
    chunk_size: usize,
}

impl CandleStore {
    /// Create a store rooted at `root` with the default chunk size.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_chunk_size(root, CHUNK_SIZE)
    }

    /// Create a store with an explicit chunk size.
    pub fn with_chunk_size<P: AsRef<Path>>(root: P, chunk_size: usize) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            chunk_size: chunk_size.max(1),
        }
    }

    /// The data directory this store writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir(&self, market: &str, period: Period) -> PathBuf {
        self.root.join(market).join(period.label())
    }

    /// All range files for a pair, sorted chronologically.
    ///
    /// Files whose names do not parse as a range are skipped; leftover
    /// `.tmp` files from an interrupted write fall in that bucket.
    fn range_files(&self, market: &str, period: Period) -> Result<Vec<PathBuf>, StoreError> {
        let dir = self.dir(market, period);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if parse_range_file_name(name).is_ok() {
                files.push(path);
            }
        }

        // ISO timestamps in the names sort chronologically.
        files.sort();
        Ok(files)
    }

    /// Load the full cached history for a pair, ascending. Empty if the
    /// pair has never been cached.
    pub fn load(&self, market: &str, period: Period) -> Result<Vec<Candle>, StoreError> {
        let mut candles = Vec::new();
        for path in self.range_files(market, period)? {
            candles.extend(read_chunk(&path)?);
        }

        log::debug!(
            "loaded {} cached candles for {market} {period}",
            candles.len()
        );
        Ok(candles)
    }

    /// Load the newest cached range for a pair, or `None` if nothing is
    /// cached yet.
    pub fn latest_range(
        &self,
        market: &str,
        period: Period,
    ) -> Result<Option<RangeTail>, StoreError> {
        let Some(path) = self.range_files(market, period)?.pop() else {
            return Ok(None);
        };

        let candles = read_chunk(&path)?;
        let Some(last) = candles.last() else {
            return Ok(None);
        };
        let newest = last.time;

        Ok(Some(RangeTail { candles, newest }))
    }

    /// Replace the cached tail for a pair.
    ///
    /// `candles` must be ascending and must start at the first candle of
    /// the current newest range (or at the beginning of history when the
    /// cache is empty): the previous newest range file is deleted and
    /// `candles` is rewritten in its place, split into chunk files. Each
    /// file goes through a temp-and-rename write, so readers never see a
    /// partial chunk.
    ///
    /// Returns the number of chunk files written.
    pub fn replace_tail(
        &self,
        market: &str,
        period: Period,
        candles: &[Candle],
    ) -> Result<usize, StoreError> {
        if candles.is_empty() {
            return Ok(0);
        }

        let dir = self.dir(market, period);
        fs::create_dir_all(&dir)?;

        // The previous tail may end on a candle that was still open when
        // it was written; drop it before rewriting.
        if let Some(previous_tail) = self.range_files(market, period)?.pop() {
            fs::remove_file(&previous_tail)?;
        }

        let mut written = 0;
        for chunk in candles.chunks(self.chunk_size) {
            // chunks() never yields an empty slice
            let start = chunk[0].time;
            let end = chunk[chunk.len() - 1].time;
            let path = dir.join(range_file_name(start, end));

            write_chunk(&path, chunk)?;
            written += 1;
        }

        log::debug!(
            "wrote {written} chunk file(s) ({} candles) for {market} {period}",
            candles.len()
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// Ascending one-minute candles starting `offset` minutes after the
    /// base time.
    fn make_candles(offset: i64, count: usize) -> Vec<Candle> {
        (0..count as i64)
            .map(|i| {
                let time = base_time() + Duration::minutes(offset + i);
                let price = 100.0 + (offset + i) as f64;
                Candle::new(time, price, price + 1.0, price - 1.0, price, 1.0, 0)
            })
            .collect()
    }

    #[test]
    fn test_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandleStore::new(dir.path());

        let candles = store.load("KRW-BTC", Period::Min1).unwrap();
        assert!(candles.is_empty());
        assert!(store.latest_range("KRW-BTC", Period::Min1).unwrap().is_none());
    }

    #[test]
    fn test_replace_tail_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandleStore::with_chunk_size(dir.path(), 5);

        let candles = make_candles(0, 12);
        let written = store.replace_tail("KRW-BTC", Period::Min1, &candles).unwrap();
        assert_eq!(written, 3); // 5 + 5 + 2

        let loaded = store.load("KRW-BTC", Period::Min1).unwrap();
        assert_eq!(loaded, candles);

        // Strictly ascending across chunk boundaries, no duplicates.
        for pair in loaded.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
    }

    #[test]
    fn test_latest_range_is_newest_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandleStore::with_chunk_size(dir.path(), 5);

        let candles = make_candles(0, 12);
        store.replace_tail("KRW-BTC", Period::Min1, &candles).unwrap();

        let tail = store.latest_range("KRW-BTC", Period::Min1).unwrap().unwrap();
        assert_eq!(tail.candles.len(), 2);
        assert_eq!(tail.newest, candles[11].time);
    }

    #[test]
    fn test_replace_tail_supersedes_previous_tail() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandleStore::with_chunk_size(dir.path(), 5);

        store
            .replace_tail("KRW-BTC", Period::Min1, &make_candles(0, 12))
            .unwrap();

        // Resume: previous tail chunk (2 candles) plus 3 new ones.
        let tail = store.latest_range("KRW-BTC", Period::Min1).unwrap().unwrap();
        let mut merged = tail.candles;
        merged.extend(make_candles(12, 3));
        store.replace_tail("KRW-BTC", Period::Min1, &merged).unwrap();

        let loaded = store.load("KRW-BTC", Period::Min1).unwrap();
        assert_eq!(loaded, make_candles(0, 15));
        for pair in loaded.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
    }

    #[test]
    fn test_no_tmp_residue() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandleStore::with_chunk_size(dir.path(), 5);

        store
            .replace_tail("KRW-BTC", Period::Min1, &make_candles(0, 12))
            .unwrap();

        let pair_dir = dir.path().join("KRW-BTC").join(Period::Min1.label());
        for entry in fs::read_dir(pair_dir).unwrap() {
            let name = entry.unwrap().file_name();
            assert!(!name.to_string_lossy().ends_with(".tmp"));
        }
    }

    #[test]
    fn test_periods_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandleStore::new(dir.path());

        store
            .replace_tail("KRW-BTC", Period::Min1, &make_candles(0, 3))
            .unwrap();
        store
            .replace_tail("KRW-BTC", Period::Day1, &make_candles(100, 2))
            .unwrap();

        assert_eq!(store.load("KRW-BTC", Period::Min1).unwrap().len(), 3);
        assert_eq!(store.load("KRW-BTC", Period::Day1).unwrap().len(), 2);
    }
}
