//! Schedule repository trait.
//!
//! The write side is a single replace-all operation so that the atomicity
//! of "update preferences, delete old rows, insert new rows" is part of the
//! interface rather than something each caller has to assemble.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::DoctorId;
use crate::models::{DoctorSchedulingPreferences, NewScheduleEntry, ScheduleEntry};

/// Repository trait for doctor schedule rows.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// All schedule entries of a doctor, in insertion order.
    ///
    /// # Returns
    /// * `Ok(Vec<ScheduleEntry>)` - Possibly empty list of entries
    /// * `Err(RepositoryError::NotFound)` - If the doctor doesn't exist
    async fn list_doctor_schedule(&self, doctor_id: DoctorId)
        -> RepositoryResult<Vec<ScheduleEntry>>;

    /// Atomically replace a doctor's schedule.
    ///
    /// Within one transaction: write `preferences` onto the doctor, delete
    /// every existing entry of the doctor, and insert `entries` in order.
    /// On any failure nothing is changed. Concurrent calls for the same
    /// doctor are serialized.
    ///
    /// # Returns
    /// * `Ok(Vec<ScheduleEntry>)` - The inserted entries with their ids
    /// * `Err(RepositoryError::NotFound)` - If the doctor doesn't exist
    /// * `Err(RepositoryError)` - If the transaction fails (rolled back)
    async fn replace_doctor_schedule(
        &self,
        doctor_id: DoctorId,
        preferences: &DoctorSchedulingPreferences,
        entries: &[NewScheduleEntry],
    ) -> RepositoryResult<Vec<ScheduleEntry>>;

    /// Delete every entry of the doctor on `date`.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of entries removed (at least one)
    /// * `Err(RepositoryError::NotFound)` - If the doctor doesn't exist or
    ///   has no entry on that date; nothing is changed
    async fn delete_schedule_for_date(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> RepositoryResult<usize>;
}
