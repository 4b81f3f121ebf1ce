//! Candle period enumeration.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;

/// Candle periods supported by the miner.
///
/// Fixed enumeration carrying the candle duration; the order of
/// [`Period::all`] is the order the miner walks when updating a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Min1,
    Min3,
    Min5,
    Min10,
    Min15,
    Min30,
    Hour1,
    Hour4,
    Day1,
    Week1,
}

impl Period {
    /// Returns the duration of one candle in minutes.
    pub fn minutes(&self) -> i64 {
        match self {
            Period::Min1 => 1,
            Period::Min3 => 3,
            Period::Min5 => 5,
            Period::Min10 => 10,
            Period::Min15 => 15,
            Period::Min30 => 30,
            Period::Hour1 => 60,
            Period::Hour4 => 240,
            Period::Day1 => 60 * 24,
            Period::Week1 => 60 * 24 * 7,
        }
    }

    /// Returns the duration of one candle.
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes())
    }

    /// Returns the display label, also used as the cache directory name.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Min1 => "1 minutes",
            Period::Min3 => "3 minutes",
            Period::Min5 => "5 minutes",
            Period::Min10 => "10 minutes",
            Period::Min15 => "15 minutes",
            Period::Min30 => "30 minutes",
            Period::Hour1 => "60 minutes",
            Period::Hour4 => "240 minutes",
            Period::Day1 => "days",
            Period::Week1 => "weeks",
        }
    }

    /// Returns all supported periods in miner order, finest first.
    pub fn all() -> &'static [Period] {
        &[
            Period::Min1,
            Period::Min3,
            Period::Min5,
            Period::Min10,
            Period::Min15,
            Period::Min30,
            Period::Hour1,
            Period::Hour4,
            Period::Day1,
            Period::Week1,
        ]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::all()
            .iter()
            .find(|p| p.label() == s)
            .copied()
            .ok_or_else(|| format!("unknown period: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_fixed_order() {
        let all = Period::all();
        assert!(!all.is_empty());
        assert_eq!(all.first(), Some(&Period::Min1));
        assert_eq!(all.last(), Some(&Period::Week1));

        // Durations strictly increase along the list.
        for pair in all.windows(2) {
            assert!(pair[0].minutes() < pair[1].minutes());
        }
    }

    #[test]
    fn test_minutes() {
        assert_eq!(Period::Min1.minutes(), 1);
        assert_eq!(Period::Hour4.minutes(), 240);
        assert_eq!(Period::Day1.minutes(), 1440);
        assert_eq!(Period::Week1.minutes(), 10080);
    }

    #[test]
    fn test_label_round_trip() {
        for &period in Period::all() {
            assert_eq!(period.label().parse::<Period>(), Ok(period));
        }
    }

    #[test]
    fn test_unknown_label() {
        assert!("months".parse::<Period>().is_err());
    }
}
