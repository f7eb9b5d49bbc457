//! Clock-time helpers for shift boundaries.
//!
//! Shift times travel as `HH:MM` strings. Input also tolerates `HH:MM:SS`
//! since some admin front-ends submit the seconds component of
//! `<input type="time">`. Seconds are dropped on parse, so every comparison
//! runs on the same minute resolution the service emits.

use chrono::{NaiveDate, NaiveTime, Timelike};

const CLOCK_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Wire format used for every time value the service emits.
pub const CLOCK_OUTPUT_FORMAT: &str = "%H:%M";

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a wall-clock time in `HH:MM` or `HH:MM:SS` form, truncated to the minute.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    let parsed = CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())?;
    NaiveTime::from_hms_opt(parsed.hour(), parsed.minute(), 0)
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Whole minutes from `start` to `end`. Negative when `end` precedes `start`.
pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    (end - start).num_minutes()
}

/// Serde adapter emitting `NaiveTime` as `HH:MM`.
pub mod clock {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format(super::CLOCK_OUTPUT_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid clock time '{}'", raw)))
    }
}
