//! Doctor repository trait.
//!
//! Covers the doctor records the schedule generator reads its settings from.
//! Preference updates are not exposed here: they only ever happen as part of
//! [`ScheduleRepository::replace_doctor_schedule`](super::ScheduleRepository::replace_doctor_schedule).

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::DoctorId;
use crate::models::Doctor;

/// Repository trait for doctor records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Create a doctor with default scheduling preferences.
    async fn create_doctor(&self, display_name: &str) -> RepositoryResult<Doctor>;

    /// Fetch a doctor by id.
    ///
    /// # Returns
    /// * `Ok(Doctor)` - The doctor with its current preferences
    /// * `Err(RepositoryError::NotFound)` - If the doctor doesn't exist
    async fn get_doctor(&self, doctor_id: DoctorId) -> RepositoryResult<Doctor>;

    /// List all doctors ordered by id.
    async fn list_doctors(&self) -> RepositoryResult<Vec<Doctor>>;
}
