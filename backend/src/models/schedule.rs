//! Domain types for doctors and their availability schedules.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::display::{parse_variant, Describe};
use super::time::clock;
use crate::api::{DoctorId, ScheduleEntryId};

/// How often a doctor's availability repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyMode {
    Daily,
    Weekly,
    Monthly,
}

/// Day of the week a recurring entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Half of the working day a shift covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftPeriod {
    Morning,
    Afternoon,
}

macro_rules! impl_wire_enum {
    ($ty:ty, $what:literal) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_variant::<$ty>(s).ok_or_else(|| {
                    let allowed: Vec<&str> = <$ty>::all().iter().map(|v| v.as_str()).collect();
                    format!(
                        "Invalid {}: '{}'. Must be one of: {}",
                        $what,
                        s,
                        allowed.join(", ")
                    )
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_wire_enum!(FrequencyMode, "frequency");
impl_wire_enum!(DayOfWeek, "day of week");
impl_wire_enum!(ShiftPeriod, "shift period");

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl DayOfWeek {
    /// Weekday a calendar date falls on.
    pub fn of_date(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

/// Per-doctor settings that drive schedule generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSchedulingPreferences {
    pub frequency_mode: FrequencyMode,
    pub patients_based_on_time: bool,
    /// Length of one bookable slot in minutes.
    pub time_slot_minutes: Option<u32>,
    /// Default patient count used when a custom-date shift gives none.
    pub patients_per_day: Option<u32>,
}

impl Default for DoctorSchedulingPreferences {
    fn default() -> Self {
        Self {
            frequency_mode: FrequencyMode::Weekly,
            patients_based_on_time: false,
            time_slot_minutes: None,
            patients_per_day: None,
        }
    }
}

/// A doctor as seen by the scheduling component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub display_name: String,
    pub preferences: DoctorSchedulingPreferences,
}

/// A schedule row ready to be persisted (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScheduleEntry {
    pub doctor_id: DoctorId,
    /// Set only for custom-date entries.
    pub date: Option<NaiveDate>,
    pub day_of_week: DayOfWeek,
    pub shift_period: ShiftPeriod,
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    pub patients_per_slot: u32,
    pub is_active: bool,
}

impl NewScheduleEntry {
    /// Attach a storage id, producing the persisted form.
    pub fn with_id(self, id: ScheduleEntryId) -> ScheduleEntry {
        ScheduleEntry {
            id,
            doctor_id: self.doctor_id,
            date: self.date,
            day_of_week: self.day_of_week,
            shift_period: self.shift_period,
            start_time: self.start_time,
            end_time: self.end_time,
            patients_per_slot: self.patients_per_slot,
            is_active: self.is_active,
        }
    }
}

/// A persisted schedule row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: ScheduleEntryId,
    pub doctor_id: DoctorId,
    pub date: Option<NaiveDate>,
    pub day_of_week: DayOfWeek,
    pub shift_period: ShiftPeriod,
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    pub patients_per_slot: u32,
    pub is_active: bool,
}

impl ScheduleEntry {
    /// Drop the id; used to compare entry sets across regenerations.
    pub fn without_id(&self) -> NewScheduleEntry {
        NewScheduleEntry {
            doctor_id: self.doctor_id,
            date: self.date,
            day_of_week: self.day_of_week,
            shift_period: self.shift_period,
            start_time: self.start_time,
            end_time: self.end_time,
            patients_per_slot: self.patients_per_slot,
            is_active: self.is_active,
        }
    }
}
