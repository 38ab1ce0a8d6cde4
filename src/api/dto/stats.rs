//! DTOs for the statistics endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::{PeriodStats, StatsGrouping};

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD&by=day|month`. All three are required.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    #[serde_as(as = "DisplayFromStr")]
    pub from: NaiveDate,

    #[serde_as(as = "DisplayFromStr")]
    pub to: NaiveDate,

    #[serde_as(as = "DisplayFromStr")]
    pub by: StatsGrouping,
}

/// One period of the aggregated statistics.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStatsResponse {
    pub period: String,
    pub total_clicks: i64,
}

impl From<PeriodStats> for PeriodStatsResponse {
    fn from(stats: PeriodStats) -> Self {
        Self {
            period: stats.period,
            total_clicks: stats.total_clicks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_parse() {
        let p: StatsParams =
            serde_json::from_str(r#"{"from":"2025-01-01","to":"2025-01-31","by":"day"}"#).unwrap();

        assert_eq!(p.from, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(p.by, StatsGrouping::Day);
    }

    #[test]
    fn test_params_reject_bad_input() {
        assert!(
            serde_json::from_str::<StatsParams>(r#"{"from":"2025-13-01","to":"2025-01-31","by":"day"}"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<StatsParams>(r#"{"from":"2025-01-01","to":"2025-01-31","by":"week"}"#)
                .is_err()
        );
        assert!(serde_json::from_str::<StatsParams>(r#"{"from":"2025-01-01","by":"day"}"#).is_err());
    }

    #[test]
    fn test_response_uses_camel_case() {
        let json = serde_json::to_value(PeriodStatsResponse {
            period: "2025-01".to_string(),
            total_clicks: 3,
        })
        .unwrap();

        assert_eq!(json["totalClicks"], 3);
    }
}
