//! Summary statistics engine.
//!
//! Computes derived metrics from a caller-supplied set of sleep records
//! (already scoped to one owner and one date range by the store):
//! - Average duration and average quality
//! - Best (longest) night
//! - Consistency percentage against the set's own mean
//! - Per-record regularity chart series

use crate::clock;
use crate::models::{RegularityPoint, SleepRecord, SleepSummary};

/// Tolerance around the mean duration within which a night counts as
/// consistent, in minutes. The boundary is inclusive.
pub const CONSISTENCY_TOLERANCE_MINUTES: f64 = 60.0;

/// Compute the four summary statistics over a set of records.
///
/// Records whose stored duration string does not parse are silently
/// excluded from every statistic; they are never treated as zero and
/// never cause an error. An empty set after filtering yields the
/// explicit no-data sentinel with 0% consistency.
pub fn summarize(records: &[SleepRecord]) -> SleepSummary {
    let parsed: Vec<(&SleepRecord, u32)> = records
        .iter()
        .filter_map(|r| {
            clock::parse_duration(&r.duration)
                .ok()
                .flatten()
                .map(|minutes| (r, minutes))
        })
        .collect();

    if parsed.is_empty() {
        return SleepSummary::no_data();
    }

    let count = parsed.len();
    let total_minutes: u64 = parsed.iter().map(|(_, m)| *m as u64).sum();
    let mean_minutes = total_minutes as f64 / count as f64;

    // Floor-round the minute remainder rather than rounding to nearest.
    let average_minutes = mean_minutes.floor() as u32;

    let total_quality: u32 = parsed.iter().map(|(r, _)| r.quality as u32).sum();
    let average_quality = round_to_tenth(total_quality as f64 / count as f64);

    // First occurrence wins ties, so only a strictly longer night
    // replaces the current best.
    let mut best = &parsed[0];
    for candidate in &parsed[1..] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }

    let consistent = parsed
        .iter()
        .filter(|(_, minutes)| (*minutes as f64 - mean_minutes).abs() <= CONSISTENCY_TOLERANCE_MINUTES)
        .count();
    let consistency_pct = ((consistent as f64 / count as f64) * 100.0).round() as u32;

    SleepSummary {
        record_count: count as u32,
        average_duration_minutes: Some(average_minutes),
        average_duration: Some(clock::format_duration(average_minutes)),
        average_quality: Some(average_quality),
        best_duration: Some(best.0.duration.clone()),
        consistency_pct,
    }
}

/// Build the regularity chart series: one point per record, with bedtime
/// and wake time mapped onto the continuous 24-hour axis.
///
/// Unlike [`summarize`], records with unparsable durations still
/// contribute their time-of-day points; only `duration_hours` is absent.
pub fn regularity_series(records: &[SleepRecord]) -> Vec<RegularityPoint> {
    records
        .iter()
        .map(|r| RegularityPoint {
            sleep_date: r.sleep_date,
            bedtime_hours: clock::continuous_hours(r.bedtime),
            wake_hours: clock::continuous_hours(r.wake_time),
            duration_hours: clock::parse_duration(&r.duration)
                .ok()
                .flatten()
                .map(|minutes| minutes as f64 / 60.0),
            quality: r.quality,
        })
        .collect()
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
