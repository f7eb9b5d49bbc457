//! Availability schedule generation.
//!
//! Turns a schedule update request into the flat list of schedule rows that
//! replaces a doctor's current schedule, together with the preferences to
//! store on the doctor record.
//!
//! Two input shapes are supported:
//!
//! - **recurring**: one row per (day of week, shift period) with explicit
//!   times and an explicit patient count, copied through as-is;
//! - **custom dates** (monthly mode only): one item per calendar date with an
//!   optional morning and/or afternoon sub-shift. A sub-shift's patient count
//!   is the explicit value if given, else the number of whole time slots that
//!   fit in the shift when the doctor books by time, else the per-day default.
//!
//! The whole request is validated up front; every violation is reported in a
//! single [`ValidationErrors`] and nothing is generated unless the request is
//! clean.

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashSet;

use super::validation::{field_path, ValidationErrors};
use crate::api::DoctorId;
use crate::models::{
    minutes_between, parse_calendar_date, parse_clock_time, DayOfWeek, Doctor,
    DoctorSchedulingPreferences, FrequencyMode, NewScheduleEntry, ShiftPeriod,
};
use crate::routes::schedule::{
    CustomDateInput, RecurringScheduleInput, ScheduleUpdateRequest, ShiftWindowInput,
};

const SCHEDULES_FIELD: &str = "schedules";
const CUSTOM_DATES_FIELD: &str = "customDates";

/// One validated weekly template row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringShift {
    pub day_of_week: DayOfWeek,
    pub shift_period: ShiftPeriod,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub patients_per_slot: u32,
}

/// One validated sub-shift of a custom date, patient count already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomShift {
    pub shift_period: ShiftPeriod,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub patients_per_slot: u32,
}

/// One validated calendar date; shifts are ordered morning, afternoon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomDay {
    pub date: NaiveDate,
    pub shifts: Vec<CustomShift>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulePlan {
    Recurring(Vec<RecurringShift>),
    CustomDates(Vec<CustomDay>),
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSchedule {
    pub preferences: DoctorSchedulingPreferences,
    pub plan: SchedulePlan,
}

/// Number of whole slots of `slot_minutes` that fit between `start` and `end`.
///
/// A shift shorter than one slot yields 0, which is accepted as-is.
pub fn patients_per_slot(start: NaiveTime, end: NaiveTime, slot_minutes: u32) -> u32 {
    if slot_minutes == 0 {
        return 0;
    }
    let duration = minutes_between(start, end);
    if duration <= 0 {
        return 0;
    }
    u32::try_from(duration / i64::from(slot_minutes)).unwrap_or(u32::MAX)
}

/// Patient count for a custom-date sub-shift.
///
/// Explicit count first, then the time-based count when the doctor books by
/// time and has a slot length, then the per-day default. `None` when none of
/// those is available.
pub fn resolve_patients_per_slot(
    explicit: Option<u32>,
    start: NaiveTime,
    end: NaiveTime,
    preferences: &DoctorSchedulingPreferences,
) -> Option<u32> {
    if let Some(count) = explicit {
        return Some(count);
    }
    match (preferences.patients_based_on_time, preferences.time_slot_minutes) {
        (true, Some(slot)) => Some(patients_per_slot(start, end, slot)),
        _ => preferences.patients_per_day,
    }
}

/// Validate a schedule update request against the doctor's current settings.
///
/// `current` supplies the stored per-day default when the request omits
/// `number_of_patients_per_day`.
pub fn validate_request(
    request: &ScheduleUpdateRequest,
    current: &DoctorSchedulingPreferences,
) -> Result<ValidatedSchedule, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let frequency_mode = match request.frequency.as_deref() {
        None => {
            errors.add("frequency", "is required");
            None
        }
        Some(raw) => match raw.parse::<FrequencyMode>() {
            Ok(mode) => Some(mode),
            Err(msg) => {
                errors.add("frequency", msg);
                None
            }
        },
    };

    let patients_based_on_time = request.patients_based_on_time.unwrap_or(false);
    let time_slot_minutes = positive_count(&mut errors, "time_slot", request.time_slot);
    if patients_based_on_time && request.time_slot.is_none() {
        errors.add("time_slot", "is required when patients_based_on_time is true");
    }
    let patients_per_day = positive_count(
        &mut errors,
        "number_of_patients_per_day",
        request.number_of_patients_per_day,
    )
    .or(current.patients_per_day);

    let preferences = DoctorSchedulingPreferences {
        frequency_mode: frequency_mode.unwrap_or(current.frequency_mode),
        patients_based_on_time,
        time_slot_minutes,
        patients_per_day,
    };

    let plan = match (&request.schedules, &request.custom_dates) {
        (None, None) => {
            let msg = "either schedules or customDates is required";
            errors.add(SCHEDULES_FIELD, msg);
            errors.add(CUSTOM_DATES_FIELD, msg);
            None
        }
        (Some(_), Some(_)) => {
            let msg = "only one of schedules or customDates may be supplied";
            errors.add(SCHEDULES_FIELD, msg);
            errors.add(CUSTOM_DATES_FIELD, msg);
            None
        }
        (Some(rows), None) => {
            if rows.is_empty() {
                errors.add(SCHEDULES_FIELD, "must contain at least one entry");
                None
            } else {
                Some(SchedulePlan::Recurring(validate_recurring(rows, &mut errors)))
            }
        }
        (None, Some(days)) => {
            if days.is_empty() {
                errors.add(CUSTOM_DATES_FIELD, "must contain at least one entry");
            }
            if matches!(frequency_mode, Some(mode) if mode != FrequencyMode::Monthly) {
                errors.add(CUSTOM_DATES_FIELD, "requires frequency 'monthly'");
            }
            if days.is_empty() {
                None
            } else {
                Some(SchedulePlan::CustomDates(validate_custom_dates(
                    days,
                    &preferences,
                    &mut errors,
                )))
            }
        }
    };

    match plan {
        Some(plan) => errors.into_result(ValidatedSchedule { preferences, plan }),
        None => Err(errors),
    }
}

/// Expand a validated schedule into rows for `doctor_id`, in input order.
pub fn generate_entries(doctor_id: DoctorId, schedule: &ValidatedSchedule) -> Vec<NewScheduleEntry> {
    match &schedule.plan {
        SchedulePlan::Recurring(rows) => rows
            .iter()
            .map(|row| NewScheduleEntry {
                doctor_id,
                date: None,
                day_of_week: row.day_of_week,
                shift_period: row.shift_period,
                start_time: row.start_time,
                end_time: row.end_time,
                patients_per_slot: row.patients_per_slot,
                is_active: true,
            })
            .collect(),
        SchedulePlan::CustomDates(days) => days
            .iter()
            .flat_map(|day| {
                let day_of_week = DayOfWeek::of_date(day.date);
                day.shifts.iter().map(move |shift| NewScheduleEntry {
                    doctor_id,
                    date: Some(day.date),
                    day_of_week,
                    shift_period: shift.shift_period,
                    start_time: shift.start_time,
                    end_time: shift.end_time,
                    patients_per_slot: shift.patients_per_slot,
                    is_active: true,
                })
            })
            .collect(),
    }
}

/// Validate and expand in one step.
pub fn build_schedule(
    doctor: &Doctor,
    request: &ScheduleUpdateRequest,
) -> Result<(DoctorSchedulingPreferences, Vec<NewScheduleEntry>), ValidationErrors> {
    let validated = validate_request(request, &doctor.preferences)?;
    let entries = generate_entries(doctor.id, &validated);
    Ok((validated.preferences, entries))
}

fn validate_recurring(
    rows: &[RecurringScheduleInput],
    errors: &mut ValidationErrors,
) -> Vec<RecurringShift> {
    let mut seen: HashSet<(DayOfWeek, ShiftPeriod)> = HashSet::new();
    let mut shifts = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let field = |leaf: &str| field_path(SCHEDULES_FIELD, idx, leaf);

        let day = required_enum::<DayOfWeek>(errors, &field("day_of_week"), &row.day_of_week);
        let period =
            required_enum::<ShiftPeriod>(errors, &field("shift_period"), &row.shift_period);
        let window = time_window(
            errors,
            &field("start_time"),
            &field("end_time"),
            &row.start_time,
            &row.end_time,
        );
        let patients = match row.patients_per_slot {
            None => {
                errors.add(field("patients_per_slot"), "is required");
                None
            }
            some => positive_count(errors, &field("patients_per_slot"), some),
        };

        if let (Some(day), Some(period)) = (day, period) {
            if !seen.insert((day, period)) {
                errors.add(
                    field("shift_period"),
                    format!("duplicate entry for {} {}", day, period),
                );
                continue;
            }
        }

        if let (Some(day_of_week), Some(shift_period), Some((start_time, end_time)), Some(count)) =
            (day, period, window, patients)
        {
            shifts.push(RecurringShift {
                day_of_week,
                shift_period,
                start_time,
                end_time,
                patients_per_slot: count,
            });
        }
    }

    shifts
}

fn validate_custom_dates(
    days: &[CustomDateInput],
    preferences: &DoctorSchedulingPreferences,
    errors: &mut ValidationErrors,
) -> Vec<CustomDay> {
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut validated = Vec::with_capacity(days.len());

    for (idx, day) in days.iter().enumerate() {
        let date_field = field_path(CUSTOM_DATES_FIELD, idx, "date");
        let date = match day.date.as_deref() {
            None => {
                errors.add(&date_field, "is required");
                None
            }
            Some(raw) => match parse_calendar_date(raw) {
                Some(date) if !seen.insert(date) => {
                    errors.add(&date_field, format!("duplicate date {}", date));
                    None
                }
                Some(date) => Some(date),
                None => {
                    errors.add(&date_field, "must be a date in YYYY-MM-DD format");
                    None
                }
            },
        };

        if day.morning.is_none() && day.afternoon.is_none() {
            errors.add(
                format!("{}.{}", CUSTOM_DATES_FIELD, idx),
                "at least one of morning or afternoon is required",
            );
            continue;
        }

        let mut shifts = Vec::with_capacity(2);
        let mut complete = true;
        for (period, window) in [
            (ShiftPeriod::Morning, &day.morning),
            (ShiftPeriod::Afternoon, &day.afternoon),
        ] {
            let Some(window) = window else { continue };
            match validate_window(idx, period, window, preferences, errors) {
                Some(shift) => shifts.push(shift),
                None => complete = false,
            }
        }

        if let (Some(date), true) = (date, complete) {
            validated.push(CustomDay { date, shifts });
        }
    }

    validated
}

fn validate_window(
    idx: usize,
    period: ShiftPeriod,
    window: &ShiftWindowInput,
    preferences: &DoctorSchedulingPreferences,
    errors: &mut ValidationErrors,
) -> Option<CustomShift> {
    let field = |leaf: &str| format!("{}.{}.{}.{}", CUSTOM_DATES_FIELD, idx, period, leaf);

    let times = time_window(
        errors,
        &field("start_time"),
        &field("end_time"),
        &window.start_time,
        &window.end_time,
    );
    let explicit = positive_count(errors, &field("patients_per_slot"), window.patients_per_slot);
    if window.patients_per_slot.is_some() && explicit.is_none() {
        return None;
    }

    let (start_time, end_time) = times?;
    match resolve_patients_per_slot(explicit, start_time, end_time, preferences) {
        Some(patients_per_slot) => Some(CustomShift {
            shift_period: period,
            start_time,
            end_time,
            patients_per_slot,
        }),
        None => {
            errors.add(
                field("patients_per_slot"),
                "is required when neither a time slot nor number_of_patients_per_day is set",
            );
            None
        }
    }
}

fn required_enum<T>(errors: &mut ValidationErrors, field: &str, raw: &Option<String>) -> Option<T>
where
    T: std::str::FromStr<Err = String>,
{
    match raw.as_deref() {
        None => {
            errors.add(field, "is required");
            None
        }
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(msg) => {
                errors.add(field, msg);
                None
            }
        },
    }
}

fn required_time(errors: &mut ValidationErrors, field: &str, raw: &Option<String>) -> Option<NaiveTime> {
    match raw.as_deref() {
        None => {
            errors.add(field, "is required");
            None
        }
        Some(value) => {
            let parsed = parse_clock_time(value);
            if parsed.is_none() {
                errors.add(field, "must be a time in HH:MM format");
            }
            parsed
        }
    }
}

/// Both ends required and `end > start`; the ordering error lands on the end field.
fn time_window(
    errors: &mut ValidationErrors,
    start_field: &str,
    end_field: &str,
    start: &Option<String>,
    end: &Option<String>,
) -> Option<(NaiveTime, NaiveTime)> {
    let start = required_time(errors, start_field, start);
    let end = required_time(errors, end_field, end);
    let (start, end) = (start?, end?);
    if end <= start {
        errors.add(end_field, "must be after start_time");
        return None;
    }
    Some((start, end))
}

/// Largest count accepted anywhere; stored counts are `INTEGER` columns.
const MAX_COUNT: u32 = i32::MAX as u32;

/// Optional positive integer no larger than [`MAX_COUNT`].
fn positive_count(errors: &mut ValidationErrors, field: &str, raw: Option<i64>) -> Option<u32> {
    let value = raw?;
    if value <= 0 {
        errors.add(field, "must be a positive integer");
        return None;
    }
    match u32::try_from(value) {
        Ok(count) if count <= MAX_COUNT => Some(count),
        _ => {
            errors.add(field, "is too large");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        parse_clock_time(s).unwrap()
    }

    #[test]
    fn test_patients_per_slot_whole_slots() {
        assert_eq!(patients_per_slot(t("09:00"), t("10:00"), 15), 4);
        assert_eq!(patients_per_slot(t("09:00"), t("10:10"), 15), 4);
        assert_eq!(patients_per_slot(t("08:00"), t("12:00"), 20), 12);
    }

    #[test]
    fn test_patients_per_slot_shorter_than_one_slot_is_zero() {
        assert_eq!(patients_per_slot(t("09:00"), t("09:10"), 15), 0);
    }

    #[test]
    fn test_patients_per_slot_degenerate_inputs() {
        assert_eq!(patients_per_slot(t("10:00"), t("09:00"), 15), 0);
        assert_eq!(patients_per_slot(t("09:00"), t("10:00"), 0), 0);
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let prefs = DoctorSchedulingPreferences {
            patients_based_on_time: true,
            time_slot_minutes: Some(15),
            patients_per_day: Some(30),
            ..Default::default()
        };
        assert_eq!(resolve_patients_per_slot(Some(2), t("09:00"), t("10:00"), &prefs), Some(2));
        assert_eq!(resolve_patients_per_slot(None, t("09:00"), t("10:00"), &prefs), Some(4));
    }

    #[test]
    fn test_resolve_falls_back_to_per_day_default() {
        let prefs = DoctorSchedulingPreferences {
            patients_based_on_time: false,
            time_slot_minutes: Some(15),
            patients_per_day: Some(30),
            ..Default::default()
        };
        assert_eq!(resolve_patients_per_slot(None, t("09:00"), t("10:00"), &prefs), Some(30));

        let bare = DoctorSchedulingPreferences::default();
        assert_eq!(resolve_patients_per_slot(None, t("09:00"), t("10:00"), &bare), None);
    }

    #[test]
    fn test_positive_count() {
        let mut errors = ValidationErrors::new();
        assert_eq!(positive_count(&mut errors, "n", None), None);
        assert_eq!(positive_count(&mut errors, "n", Some(3)), Some(3));
        assert!(errors.is_empty());

        assert_eq!(positive_count(&mut errors, "zero", Some(0)), None);
        assert_eq!(positive_count(&mut errors, "neg", Some(-4)), None);
        assert_eq!(positive_count(&mut errors, "big", Some(i64::from(u32::MAX) + 1)), None);
        assert_eq!(errors.messages("zero"), ["must be a positive integer"]);
        assert_eq!(errors.messages("neg"), ["must be a positive integer"]);
        assert_eq!(errors.messages("big"), ["is too large"]);
    }

    #[test]
    fn test_positive_count_stops_at_integer_column_range() {
        let mut errors = ValidationErrors::new();
        let limit = i64::from(i32::MAX);
        assert_eq!(positive_count(&mut errors, "at", Some(limit)), Some(i32::MAX as u32));
        assert!(errors.is_empty());

        assert_eq!(positive_count(&mut errors, "over", Some(limit + 1)), None);
        assert_eq!(positive_count(&mut errors, "far", Some(3_000_000_000)), None);
        assert_eq!(errors.messages("over"), ["is too large"]);
        assert_eq!(errors.messages("far"), ["is too large"]);
    }

    #[test]
    fn test_time_window_requires_order() {
        let mut errors = ValidationErrors::new();
        let window = time_window(
            &mut errors,
            "s",
            "e",
            &Some("10:00".to_string()),
            &Some("10:00".to_string()),
        );
        assert!(window.is_none());
        assert_eq!(errors.messages("e"), ["must be after start_time"]);
        assert!(!errors.contains("s"));
    }
}
