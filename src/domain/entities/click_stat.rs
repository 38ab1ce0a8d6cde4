//! Aggregated views over the daily click counters.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Granularity of an aggregated statistics query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsGrouping {
    Day,
    Month,
}

impl StatsGrouping {
    /// PostgreSQL `to_char` pattern producing the period label.
    pub fn pg_format(self) -> &'static str {
        match self {
            Self::Day => "YYYY-MM-DD",
            Self::Month => "YYYY-MM",
        }
    }

    /// Period label for a date, matching [`Self::pg_format`].
    pub fn period_of(self, date: NaiveDate) -> String {
        match self {
            Self::Day => date.format("%Y-%m-%d").to_string(),
            Self::Month => date.format("%Y-%m").to_string(),
        }
    }
}

impl FromStr for StatsGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            other => Err(format!("Unsupported grouping '{other}', expected 'day' or 'month'")),
        }
    }
}

impl fmt::Display for StatsGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => f.write_str("day"),
            Self::Month => f.write_str("month"),
        }
    }
}

/// Inclusive date range plus grouping for aggregate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub by: StatsGrouping,
}

/// Total clicks across all links for one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodStats {
    pub period: String,
    pub total_clicks: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_parse() {
        assert_eq!("day".parse::<StatsGrouping>(), Ok(StatsGrouping::Day));
        assert_eq!("month".parse::<StatsGrouping>(), Ok(StatsGrouping::Month));
        assert!("week".parse::<StatsGrouping>().is_err());
        assert!("Day".parse::<StatsGrouping>().is_err());
        assert!("".parse::<StatsGrouping>().is_err());
    }

    #[test]
    fn test_period_labels() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();

        assert_eq!(StatsGrouping::Day.period_of(date), "2025-03-07");
        assert_eq!(StatsGrouping::Month.period_of(date), "2025-03");
    }
}
