//! Range file naming and chunk I/O.

use std::fs;
use std::path::Path;

use candleboard_core::Candle;
use chrono::NaiveDateTime;

use crate::StoreError;

const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// File name for a chunk spanning `start..=end`.
pub(crate) fn range_file_name(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!(
        "{} - {}.csv",
        start.format(TIME_FMT),
        end.format(TIME_FMT)
    )
}

/// Parse a range file name back into its (start, end) span.
pub(crate) fn parse_range_file_name(
    name: &str,
) -> Result<(NaiveDateTime, NaiveDateTime), StoreError> {
    let bad = || StoreError::BadRangeName(name.to_string());

    let stem = name.strip_suffix(".csv").ok_or_else(bad)?;
    let (start, end) = stem.split_once(" - ").ok_or_else(bad)?;

    let start = NaiveDateTime::parse_from_str(start, TIME_FMT).map_err(|_| bad())?;
    let end = NaiveDateTime::parse_from_str(end, TIME_FMT).map_err(|_| bad())?;

    Ok((start, end))
}

/// Read one chunk file.
pub(crate) fn read_chunk(path: &Path) -> Result<Vec<Candle>, StoreError> {
    let mut reader = csv::ReaderBuilder::new().from_path(path)?;

    let mut candles = Vec::new();
    for result in reader.deserialize() {
        candles.push(result?);
    }

    Ok(candles)
}

/// Write one chunk file.
///
/// The chunk is written to a sibling `.tmp` path first and renamed into
/// place, so a crash mid-write never leaves a torn chunk behind.
pub(crate) fn write_chunk(path: &Path, candles: &[Candle]) -> Result<(), StoreError> {
    let tmp = path.with_extension("csv.tmp");

    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        for candle in candles {
            writer.serialize(candle)?;
        }
        writer.flush()?;
    }

    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIME_FMT).unwrap()
    }

    #[test]
    fn test_range_name_round_trip() {
        let start = dt("2023-01-01T00:00:00");
        let end = dt("2023-01-07T23:59:00");

        let name = range_file_name(start, end);
        assert_eq!(name, "2023-01-01T00:00:00 - 2023-01-07T23:59:00.csv");

        let (parsed_start, parsed_end) = parse_range_file_name(&name).unwrap();
        assert_eq!(parsed_start, start);
        assert_eq!(parsed_end, end);
    }

    #[test]
    fn test_range_names_sort_chronologically() {
        let a = range_file_name(dt("2022-12-31T23:59:00"), dt("2023-01-01T00:00:00"));
        let b = range_file_name(dt("2023-01-01T00:01:00"), dt("2023-02-01T00:00:00"));
        assert!(a < b);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_range_file_name("notes.txt").is_err());
        assert!(parse_range_file_name("2023-01-01T00:00:00.csv").is_err());
        assert!(parse_range_file_name("a - b.csv").is_err());
    }

    #[test]
    fn test_chunk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunk.csv");

        let time = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let candles = vec![
            Candle::new(time, 100.0, 110.0, 95.0, 105.0, 12.5, 1672531200000),
            Candle::new(
                time + chrono::Duration::minutes(1),
                105.0,
                106.0,
                101.0,
                102.0,
                3.25,
                1672531260000,
            ),
        ];

        write_chunk(&path, &candles).unwrap();
        let loaded = read_chunk(&path).unwrap();

        assert_eq!(loaded, candles);
    }
}
