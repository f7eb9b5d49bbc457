//! Catalogue of the closed scheduling enums for admin selectors.

use serde::{Deserialize, Serialize};

use crate::models::{DayOfWeek, Describe, FrequencyMode, ShiftPeriod};

/// One selectable value with its presentation attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub value: String,
    pub label: String,
    pub color: String,
    pub icon: String,
}

impl OptionEntry {
    fn of<T: Describe>(variant: T) -> Self {
        let meta = variant.meta();
        Self {
            value: variant.as_str().to_string(),
            label: meta.label.to_string(),
            color: meta.color.to_string(),
            icon: meta.icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOptions {
    pub frequencies: Vec<OptionEntry>,
    pub days_of_week: Vec<OptionEntry>,
    pub shift_periods: Vec<OptionEntry>,
}

impl ScheduleOptions {
    pub fn catalogue() -> Self {
        Self {
            frequencies: entries::<FrequencyMode>(),
            days_of_week: entries::<DayOfWeek>(),
            shift_periods: entries::<ShiftPeriod>(),
        }
    }
}

fn entries<T: Describe>() -> Vec<OptionEntry> {
    T::all().iter().copied().map(OptionEntry::of).collect()
}

pub const GET_SCHEDULE_OPTIONS: &str = "get_schedule_options";
