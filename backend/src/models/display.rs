//! Display metadata for the closed scheduling enums.
//!
//! Admin screens render frequencies, weekdays and shift periods as coloured
//! badges. The label/colour/icon for every variant lives in a static table
//! keyed by the variant, so adding a variant without its metadata fails to
//! compile rather than falling back to a reflected name at runtime.

use serde::Serialize;

use super::schedule::{DayOfWeek, FrequencyMode, ShiftPeriod};

/// Presentation attributes attached to an enum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayMeta {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

/// Implemented by every enum that exposes display metadata.
pub trait Describe: Copy + 'static {
    /// Stable lowercase wire value.
    fn as_str(&self) -> &'static str;

    /// Static presentation attributes.
    fn meta(&self) -> &'static DisplayMeta;

    /// Every variant in declaration order.
    fn all() -> &'static [Self];
}

static FREQUENCY_META: [(FrequencyMode, DisplayMeta); 3] = [
    (
        FrequencyMode::Daily,
        DisplayMeta { label: "Daily", color: "#0ea5e9", icon: "calendar-day" },
    ),
    (
        FrequencyMode::Weekly,
        DisplayMeta { label: "Weekly", color: "#6366f1", icon: "calendar-week" },
    ),
    (
        FrequencyMode::Monthly,
        DisplayMeta { label: "Monthly", color: "#a855f7", icon: "calendar-days" },
    ),
];

static SHIFT_META: [(ShiftPeriod, DisplayMeta); 2] = [
    (
        ShiftPeriod::Morning,
        DisplayMeta { label: "Morning", color: "#f59e0b", icon: "sun" },
    ),
    (
        ShiftPeriod::Afternoon,
        DisplayMeta { label: "Afternoon", color: "#f97316", icon: "cloud-sun" },
    ),
];

static DAY_META: [(DayOfWeek, DisplayMeta); 7] = [
    (DayOfWeek::Monday, DisplayMeta { label: "Monday", color: "#2563eb", icon: "mon" }),
    (DayOfWeek::Tuesday, DisplayMeta { label: "Tuesday", color: "#2563eb", icon: "tue" }),
    (DayOfWeek::Wednesday, DisplayMeta { label: "Wednesday", color: "#2563eb", icon: "wed" }),
    (DayOfWeek::Thursday, DisplayMeta { label: "Thursday", color: "#2563eb", icon: "thu" }),
    (DayOfWeek::Friday, DisplayMeta { label: "Friday", color: "#2563eb", icon: "fri" }),
    (DayOfWeek::Saturday, DisplayMeta { label: "Saturday", color: "#64748b", icon: "sat" }),
    (DayOfWeek::Sunday, DisplayMeta { label: "Sunday", color: "#64748b", icon: "sun" }),
];

// Tables are declared in variant order, so the discriminant indexes them.
impl Describe for FrequencyMode {
    fn as_str(&self) -> &'static str {
        match self {
            FrequencyMode::Daily => "daily",
            FrequencyMode::Weekly => "weekly",
            FrequencyMode::Monthly => "monthly",
        }
    }

    fn meta(&self) -> &'static DisplayMeta {
        &FREQUENCY_META[*self as usize].1
    }

    fn all() -> &'static [Self] {
        &[FrequencyMode::Daily, FrequencyMode::Weekly, FrequencyMode::Monthly]
    }
}

impl Describe for ShiftPeriod {
    fn as_str(&self) -> &'static str {
        match self {
            ShiftPeriod::Morning => "morning",
            ShiftPeriod::Afternoon => "afternoon",
        }
    }

    fn meta(&self) -> &'static DisplayMeta {
        &SHIFT_META[*self as usize].1
    }

    fn all() -> &'static [Self] {
        &[ShiftPeriod::Morning, ShiftPeriod::Afternoon]
    }
}

impl Describe for DayOfWeek {
    fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    fn meta(&self) -> &'static DisplayMeta {
        &DAY_META[*self as usize].1
    }

    fn all() -> &'static [Self] {
        &[
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
            DayOfWeek::Saturday,
            DayOfWeek::Sunday,
        ]
    }
}

/// Case-insensitive lookup of a variant by its wire value.
pub fn parse_variant<T: Describe>(value: &str) -> Option<T> {
    let needle = value.trim();
    T::all()
        .iter()
        .copied()
        .find(|v| v.as_str().eq_ignore_ascii_case(needle))
}
