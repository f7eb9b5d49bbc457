//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory behind a single `RwLock`, which is what makes
//! `replace_doctor_schedule` atomic: readers either see the old entry set or
//! the new one, never an empty set in between.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{DoctorId, ScheduleEntryId};
use crate::db::repository::*;
use crate::models::{
    Doctor, DoctorSchedulingPreferences, NewScheduleEntry, ScheduleEntry,
};
use crate::routes::doctors::GET_DOCTOR;
use crate::routes::schedule::{DELETE_SCHEDULE_DATE, GET_DOCTOR_SCHEDULE, PUT_DOCTOR_SCHEDULE};

/// In-memory local repository.
///
/// # Example
/// ```
/// use clinic_schedule::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// repo.seed_doctor("Dr. Mina Farouk");
/// assert_eq!(repo.doctor_count(), 1);
/// assert_eq!(repo.entry_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    doctors: BTreeMap<DoctorId, Doctor>,
    schedules: BTreeMap<DoctorId, Vec<ScheduleEntry>>,

    // ID counters
    next_doctor_id: i64,
    next_entry_id: i64,

    // Connection health
    is_healthy: bool,

    // Number of upcoming replace calls that fail after staging their changes
    pending_write_faults: usize,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            doctors: BTreeMap::new(),
            schedules: BTreeMap::new(),
            next_doctor_id: 1,
            next_entry_id: 1,
            is_healthy: true,
            pending_write_faults: 0,
        }
    }
}

impl LocalData {
    fn doctor(&self, doctor_id: DoctorId, operation: &str) -> RepositoryResult<&Doctor> {
        self.doctors.get(&doctor_id).ok_or_else(|| doctor_not_found(doctor_id, operation))
    }
}

fn doctor_not_found(doctor_id: DoctorId, operation: &str) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Doctor {} not found", doctor_id),
        ErrorContext::new(operation)
            .with_entity("doctor")
            .with_entity_id(doctor_id),
    )
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Insert a doctor synchronously; convenience for tests and dev seeding.
    pub fn seed_doctor(&self, display_name: &str) -> Doctor {
        let mut data = self.data.write();
        let id = DoctorId::new(data.next_doctor_id);
        data.next_doctor_id += 1;

        let doctor = Doctor {
            id,
            display_name: display_name.to_string(),
            preferences: DoctorSchedulingPreferences::default(),
        };
        data.doctors.insert(id, doctor.clone());
        doctor
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Make the next `count` schedule replacements fail after the new rows
    /// are staged, simulating a storage fault mid-transaction.
    pub fn inject_write_faults(&self, count: usize) {
        self.data.write().pending_write_faults = count;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of doctors stored.
    pub fn doctor_count(&self) -> usize {
        self.data.read().doctors.len()
    }

    /// Total number of schedule entries across all doctors.
    pub fn entry_count(&self) -> usize {
        self.data.read().schedules.values().map(Vec::len).sum()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DoctorRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_doctor(&self, display_name: &str) -> RepositoryResult<Doctor> {
        self.check_health()?;
        Ok(self.seed_doctor(display_name))
    }

    async fn get_doctor(&self, doctor_id: DoctorId) -> RepositoryResult<Doctor> {
        self.check_health()?;
        let data = self.data.read();
        data.doctor(doctor_id, GET_DOCTOR).cloned()
    }

    async fn list_doctors(&self) -> RepositoryResult<Vec<Doctor>> {
        self.check_health()?;
        Ok(self.data.read().doctors.values().cloned().collect())
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn list_doctor_schedule(
        &self,
        doctor_id: DoctorId,
    ) -> RepositoryResult<Vec<ScheduleEntry>> {
        self.check_health()?;
        let data = self.data.read();
        data.doctor(doctor_id, GET_DOCTOR_SCHEDULE)?;
        Ok(data.schedules.get(&doctor_id).cloned().unwrap_or_default())
    }

    async fn replace_doctor_schedule(
        &self,
        doctor_id: DoctorId,
        preferences: &DoctorSchedulingPreferences,
        entries: &[NewScheduleEntry],
    ) -> RepositoryResult<Vec<ScheduleEntry>> {
        self.check_health()?;
        let mut data = self.data.write();
        data.doctor(doctor_id, PUT_DOCTOR_SCHEDULE)?;

        // Stage everything first; nothing below this point may fail after
        // the doctor or the schedule map is touched.
        let first_id = data.next_entry_id;
        let staged: Vec<ScheduleEntry> = entries
            .iter()
            .cloned()
            .zip(first_id..)
            .map(|(entry, id)| {
                NewScheduleEntry { doctor_id, ..entry }.with_id(ScheduleEntryId::new(id))
            })
            .collect();

        if data.pending_write_faults > 0 {
            data.pending_write_faults -= 1;
            return Err(RepositoryError::TransactionError {
                message: "simulated storage fault during schedule insert".to_string(),
                context: ErrorContext::new(PUT_DOCTOR_SCHEDULE)
                    .with_entity("doctor")
                    .with_entity_id(doctor_id),
            });
        }

        data.next_entry_id = first_id + staged.len() as i64;
        if let Some(doctor) = data.doctors.get_mut(&doctor_id) {
            doctor.preferences.frequency_mode = preferences.frequency_mode;
            doctor.preferences.patients_based_on_time = preferences.patients_based_on_time;
            doctor.preferences.time_slot_minutes = preferences.time_slot_minutes;
            doctor.preferences.patients_per_day = preferences.patients_per_day;
        }
        data.schedules.insert(doctor_id, staged.clone());

        Ok(staged)
    }

    async fn delete_schedule_for_date(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> RepositoryResult<usize> {
        self.check_health()?;
        let mut data = self.data.write();
        data.doctor(doctor_id, DELETE_SCHEDULE_DATE)?;

        let Some(entries) = data.schedules.get_mut(&doctor_id) else {
            return Err(entry_not_found(doctor_id, date));
        };
        let before = entries.len();
        entries.retain(|e| e.date != Some(date));
        let removed = before - entries.len();

        if removed == 0 {
            return Err(entry_not_found(doctor_id, date));
        }
        Ok(removed)
    }
}

fn entry_not_found(doctor_id: DoctorId, date: NaiveDate) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("No schedule entry for doctor {} on {}", doctor_id, date),
        ErrorContext::new(DELETE_SCHEDULE_DATE)
            .with_entity("schedule_entry")
            .with_entity_id(format!("{}@{}", doctor_id, date)),
    )
}
