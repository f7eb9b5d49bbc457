#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use clinic_schedule::api::{
    CustomDateInput, RecurringScheduleInput, ScheduleUpdateRequest, ShiftWindowInput,
};
use clinic_schedule::db::repositories::LocalRepository;
use clinic_schedule::models::Doctor;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process-global environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =========================================================
// Fixtures
// =========================================================

/// Fresh in-memory repository holding one doctor with default preferences.
pub fn repo_with_doctor(name: &str) -> (LocalRepository, Doctor) {
    let repo = LocalRepository::new();
    let doctor = repo.seed_doctor(name);
    (repo, doctor)
}

pub fn weekly_row(
    day: &str,
    shift: &str,
    start: &str,
    end: &str,
    patients: i64,
) -> RecurringScheduleInput {
    RecurringScheduleInput {
        day_of_week: Some(day.to_string()),
        shift_period: Some(shift.to_string()),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        patients_per_slot: Some(patients),
    }
}

pub fn window(start: &str, end: &str) -> ShiftWindowInput {
    ShiftWindowInput {
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        patients_per_slot: None,
    }
}

pub fn custom_date(
    date: &str,
    morning: Option<ShiftWindowInput>,
    afternoon: Option<ShiftWindowInput>,
) -> CustomDateInput {
    CustomDateInput {
        date: Some(date.to_string()),
        morning,
        afternoon,
    }
}

pub fn weekly_request(rows: Vec<RecurringScheduleInput>) -> ScheduleUpdateRequest {
    ScheduleUpdateRequest {
        frequency: Some("weekly".to_string()),
        schedules: Some(rows),
        ..Default::default()
    }
}

/// Monthly request booking by time with the given slot length.
pub fn timed_monthly_request(slot: i64, days: Vec<CustomDateInput>) -> ScheduleUpdateRequest {
    ScheduleUpdateRequest {
        frequency: Some("monthly".to_string()),
        patients_based_on_time: Some(true),
        time_slot: Some(slot),
        custom_dates: Some(days),
        ..Default::default()
    }
}
