//! Sleep record model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{RecordId, UserId};
use crate::clock;

/// Error for a quality rating outside the 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quality must be between 1 and 5, got {0}")]
pub struct InvalidQuality(pub u8);

/// One night of sleep, owned by exactly one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: RecordId,

    /// The owning account. All reads and writes are scoped to it.
    pub owner_id: UserId,

    /// Calendar date the night is filed under (date-only semantics).
    pub sleep_date: NaiveDate,

    /// Wall-clock bedtime, minute precision.
    #[serde(with = "hhmm")]
    pub bedtime: NaiveTime,

    /// Wall-clock wake time, minute precision.
    #[serde(with = "hhmm")]
    pub wake_time: NaiveTime,

    /// Derived `"Hh Mm"` duration. Stored redundantly alongside the two
    /// times it was derived from, so every create/update recomputes it.
    pub duration: String,

    /// Self-reported quality, 1-5.
    pub quality: u8,

    #[serde(default)]
    pub notes: String,

    /// When this record was created (immutable across edits).
    pub created_at: DateTime<Utc>,
}

impl SleepRecord {
    /// Create a record for one night, deriving the duration from the two
    /// times. Fails only on an out-of-range quality rating.
    pub fn new(
        owner_id: UserId,
        sleep_date: NaiveDate,
        bedtime: NaiveTime,
        wake_time: NaiveTime,
        quality: u8,
        notes: String,
    ) -> Result<Self, InvalidQuality> {
        validate_quality(quality)?;

        Ok(Self {
            id: RecordId::generate(),
            owner_id,
            sleep_date,
            bedtime,
            wake_time,
            duration: derive_duration(bedtime, wake_time),
            quality,
            notes,
            created_at: Utc::now(),
        })
    }

    /// Apply an edit in place, re-deriving the duration. The id, owner
    /// and creation timestamp never change.
    pub fn apply_edit(
        &mut self,
        sleep_date: NaiveDate,
        bedtime: NaiveTime,
        wake_time: NaiveTime,
        quality: u8,
        notes: String,
    ) -> Result<(), InvalidQuality> {
        validate_quality(quality)?;

        self.sleep_date = sleep_date;
        self.bedtime = bedtime;
        self.wake_time = wake_time;
        self.duration = derive_duration(bedtime, wake_time);
        self.quality = quality;
        self.notes = notes;
        Ok(())
    }
}

fn validate_quality(quality: u8) -> Result<(), InvalidQuality> {
    if (1..=5).contains(&quality) {
        Ok(())
    } else {
        Err(InvalidQuality(quality))
    }
}

fn derive_duration(bedtime: NaiveTime, wake_time: NaiveTime) -> String {
    clock::format_duration(clock::night_duration(bedtime, wake_time))
}

/// Serialize wall-clock times as `HH:MM`, the format records are
/// submitted and displayed in.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        crate::clock::parse_time_of_day(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        clock::parse_time_of_day(s).unwrap()
    }

    fn record(bed: &str, wake: &str, quality: u8) -> Result<SleepRecord, InvalidQuality> {
        SleepRecord::new(
            UserId::generate(),
            NaiveDate::from_ymd_opt(2025, 7, 12).unwrap(),
            t(bed),
            t(wake),
            quality,
            String::new(),
        )
    }

    #[test]
    fn test_duration_derived_on_create() {
        let rec = record("23:00", "07:00", 4).unwrap();
        assert_eq!(rec.duration, "8h 0m");
    }

    #[test]
    fn test_quality_bounds() {
        assert!(record("23:00", "07:00", 0).is_err());
        assert!(record("23:00", "07:00", 6).is_err());
        assert!(record("23:00", "07:00", 1).is_ok());
        assert!(record("23:00", "07:00", 5).is_ok());
    }

    #[test]
    fn test_edit_recomputes_duration() {
        let mut rec = record("23:00", "07:00", 4).unwrap();
        let id = rec.id;
        let created = rec.created_at;

        rec.apply_edit(
            rec.sleep_date,
            t("22:30"),
            t("06:00"),
            3,
            "restless".to_string(),
        )
        .unwrap();

        assert_eq!(rec.duration, "7h 30m");
        assert_eq!(rec.quality, 3);
        assert_eq!(rec.id, id);
        assert_eq!(rec.created_at, created);
    }

    #[test]
    fn test_edit_rejects_bad_quality() {
        let mut rec = record("23:00", "07:00", 4).unwrap();
        let before = rec.clone();

        assert!(rec
            .apply_edit(rec.sleep_date, t("22:00"), t("06:00"), 9, String::new())
            .is_err());

        // A rejected edit leaves the record untouched.
        assert_eq!(rec.duration, before.duration);
        assert_eq!(rec.quality, before.quality);
    }

    #[test]
    fn test_times_serialize_as_hhmm() {
        let rec = record("23:05", "07:00", 4).unwrap();
        let json = serde_json::to_string(&rec).unwrap();

        assert!(json.contains("\"bedtime\":\"23:05\""));
        assert!(json.contains("\"wake_time\":\"07:00\""));

        let back: SleepRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bedtime, rec.bedtime);
        assert_eq!(back.duration, "8h 0m");
    }
}
