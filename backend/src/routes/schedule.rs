//! Request and response types for the doctor schedule resource.
//!
//! Request types keep every field optional, with enums and times as raw
//! strings; the schedule validator reports malformed input field by field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::DoctorId;
use crate::models::{Doctor, FrequencyMode, ScheduleEntry};

/// Body of `PUT /v1/doctors/{doctor_id}/schedule`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patients_based_on_time: Option<bool>,
    /// Slot length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_patients_per_day: Option<i64>,
    /// Weekly template rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedules: Option<Vec<RecurringScheduleInput>>,
    /// Per-date overrides (monthly mode).
    #[serde(
        default,
        rename = "customDates",
        alias = "custom_dates",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_dates: Option<Vec<CustomDateInput>>,
}

/// One weekly template row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecurringScheduleInput {
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub shift_period: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub patients_per_slot: Option<i64>,
}

/// Start/end window of a morning or afternoon sub-shift.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftWindowInput {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub patients_per_slot: Option<i64>,
}

/// One calendar date with optional morning and afternoon sub-shifts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomDateInput {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub morning: Option<ShiftWindowInput>,
    #[serde(default)]
    pub afternoon: Option<ShiftWindowInput>,
}

/// Current schedule of a doctor plus the preferences that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorScheduleResponse {
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub frequency: FrequencyMode,
    pub patients_based_on_time: bool,
    pub time_slot: Option<u32>,
    pub number_of_patients_per_day: Option<u32>,
    pub schedules: Vec<ScheduleEntry>,
}

impl DoctorScheduleResponse {
    pub fn new(doctor: &Doctor, schedules: Vec<ScheduleEntry>) -> Self {
        Self {
            doctor_id: doctor.id,
            doctor_name: doctor.display_name.clone(),
            frequency: doctor.preferences.frequency_mode,
            patients_based_on_time: doctor.preferences.patients_based_on_time,
            time_slot: doctor.preferences.time_slot_minutes,
            number_of_patients_per_day: doctor.preferences.patients_per_day,
            schedules,
        }
    }
}

/// Query string of `DELETE /v1/doctors/{doctor_id}/schedule`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteScheduleQuery {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteScheduleResponse {
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
    pub deleted: usize,
}

pub const GET_DOCTOR_SCHEDULE: &str = "get_doctor_schedule";
pub const PUT_DOCTOR_SCHEDULE: &str = "replace_doctor_schedule";
pub const DELETE_SCHEDULE_DATE: &str = "delete_schedule_for_date";
