//! Summary statistics and chart-series models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The four summary statistics over a set of sleep records.
///
/// `None` fields are the explicit "no data" sentinel: the filtered set
/// was empty, so there is no average or best value to report. They are
/// never zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSummary {
    /// Number of records that contributed (parseable durations only).
    pub record_count: u32,

    /// Mean duration, floor-rounded to whole minutes.
    pub average_duration_minutes: Option<u32>,

    /// Mean duration rendered as `"Hh Mm"`.
    pub average_duration: Option<String>,

    /// Mean quality rating, one decimal place.
    pub average_quality: Option<f64>,

    /// Duration string of the longest night (first occurrence wins ties).
    pub best_duration: Option<String>,

    /// Share of records within 60 minutes of the set's own mean duration,
    /// rounded to the nearest whole percent. 0 when there is no data.
    pub consistency_pct: u32,
}

impl SleepSummary {
    /// The sentinel summary for an empty (post-filter) record set.
    pub fn no_data() -> Self {
        Self {
            record_count: 0,
            average_duration_minutes: None,
            average_duration: None,
            average_quality: None,
            best_duration: None,
            consistency_pct: 0,
        }
    }
}

/// One record's contribution to the regularity chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularityPoint {
    pub sleep_date: NaiveDate,

    /// Bedtime on the continuous 24-hour axis (pre-noon times get +24).
    pub bedtime_hours: f64,

    /// Wake time on the same continuous axis.
    pub wake_hours: f64,

    /// Slept duration in hours; `None` when the stored duration string
    /// does not parse.
    pub duration_hours: Option<f64>,

    pub quality: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_sentinel() {
        let summary = SleepSummary::no_data();

        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.average_duration, None);
        assert_eq!(summary.average_quality, None);
        assert_eq!(summary.best_duration, None);
        assert_eq!(summary.consistency_pct, 0);
    }

    #[test]
    fn test_no_data_serializes_as_null_not_zero() {
        let json = serde_json::to_value(SleepSummary::no_data()).unwrap();

        assert!(json["average_duration"].is_null());
        assert!(json["average_quality"].is_null());
        assert_eq!(json["consistency_pct"], 0);
    }
}
