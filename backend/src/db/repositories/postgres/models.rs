use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

use super::schema::{doctor_schedules, doctors};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // Timestamps are only read by operators
pub struct DoctorRow {
    pub doctor_id: i64,
    pub display_name: String,
    pub frequency_mode: String,
    pub patients_based_on_time: bool,
    pub time_slot_minutes: Option<i32>,
    pub patients_per_day: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = doctors)]
pub struct NewDoctorRow {
    pub display_name: String,
    pub frequency_mode: String,
    pub patients_based_on_time: bool,
    pub time_slot_minutes: Option<i32>,
    pub patients_per_day: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctor_schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // created_at is only read by operators
pub struct ScheduleRow {
    pub schedule_entry_id: i64,
    pub doctor_id: i64,
    pub schedule_date: Option<NaiveDate>,
    pub day_of_week: String,
    pub shift_period: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub patients_per_slot: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = doctor_schedules)]
pub struct NewScheduleRow {
    pub doctor_id: i64,
    pub schedule_date: Option<NaiveDate>,
    pub day_of_week: String,
    pub shift_period: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub patients_per_slot: i32,
    pub is_active: bool,
}
