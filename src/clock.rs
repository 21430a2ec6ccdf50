//! Clock-time and duration codecs.
//!
//! Pure functions shared by the record model and the statistics engine:
//! parsing/formatting of `HH:MM` wall-clock strings and `"Hh Mm"` duration
//! strings, overnight duration computation, and the continuous-hours
//! mapping used by the regularity series.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

/// Errors from parsing time-of-day or duration strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid time of day (expected HH:MM): {0:?}")]
    Time(String),

    #[error("invalid duration (expected \"Hh Mm\"): {0:?}")]
    Duration(String),
}

/// Parse a wall-clock `HH:MM` string into a `NaiveTime`.
///
/// Accepts hours 0-23 and minutes 0-59; anything else is a `FormatError`.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, FormatError> {
    let err = || FormatError::Time(s.to_string());

    let (hour_part, minute_part) = s.trim().split_once(':').ok_or_else(err)?;
    let hour: u32 = parse_clock_field(hour_part).ok_or_else(err)?;
    let minute: u32 = parse_clock_field(minute_part).ok_or_else(err)?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(err)
}

fn parse_clock_field(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Render a duration in minutes as `"Hh Mm"`.
///
/// The minute component of the output is always in [0, 60).
pub fn format_duration(total_minutes: u32) -> String {
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Parse a `"Hh Mm"` duration string back into total minutes.
///
/// Returns `Err(FormatError)` for structurally malformed input (missing
/// `h` token, non-numeric parts) and `Ok(None)` for input that parses but
/// is unusable downstream (minute component >= 60, which
/// [`format_duration`] never emits). Callers must exclude both from
/// aggregation rather than treating them as zero.
pub fn parse_duration(s: &str) -> Result<Option<u32>, FormatError> {
    let err = || FormatError::Duration(s.to_string());

    let trimmed = s.trim();
    let (hours_part, rest) = trimmed.split_once('h').ok_or_else(err)?;
    let hours: u32 = hours_part.trim().parse().map_err(|_| err())?;

    let rest = rest.trim();
    let minutes: u32 = if rest.is_empty() {
        0
    } else {
        let minutes_part = rest.strip_suffix('m').ok_or_else(err)?;
        minutes_part.trim().parse().map_err(|_| err())?
    };

    if minutes >= 60 {
        return Ok(None);
    }
    Ok(hours.checked_mul(60).and_then(|h| h.checked_add(minutes)))
}

/// Compute the slept duration in whole minutes between a bedtime and a
/// wake time, both interpreted on the same calendar day.
///
/// A wake time not strictly after the bedtime is treated as falling on
/// the following day (overnight wraparound). As a consequence,
/// `bedtime == wake_time` yields a full 24h rather than zero.
pub fn night_duration(bedtime: NaiveTime, wake_time: NaiveTime) -> u32 {
    let bed = minute_of_day(bedtime);
    let wake = minute_of_day(wake_time);

    if wake <= bed {
        wake + 24 * 60 - bed
    } else {
        wake - bed
    }
}

/// Map a time-of-day onto a continuous 24-hour axis for regularity plots.
///
/// Times from 00:00 up to (but not including) 12:00 are treated as
/// belonging to the following day and get +24, so bedtimes clustered
/// around midnight (e.g. 23:30 then 00:30 the next night) plot as
/// adjacent values instead of wrapping. 11:59 maps to 35.98..; 12:00
/// maps to exactly 12.0.
pub fn continuous_hours(t: NaiveTime) -> f64 {
    let hours = t.hour() as f64 + t.minute() as f64 / 60.0;
    if hours < 12.0 {
        hours + 24.0
    } else {
        hours
    }
}

fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}
