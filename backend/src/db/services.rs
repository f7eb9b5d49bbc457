//! Repository-agnostic service layer.
//!
//! Every HTTP handler goes through these functions; they work with any
//! [`FullRepository`] implementation, including `&dyn FullRepository`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer (axum handlers)                             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - request validation and schedule generation           │
//! │  - doctor registry                                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! │  - DoctorRepository                                     │
//! │  - ScheduleRepository (atomic replace-all)              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ Postgres (Diesel)│     │ Local Repository        │
//! │                  │     │ (in-memory)             │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use clinic_schedule::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let doctor = services::create_doctor(&repo, "Dr. Ana Ruiz").await?;
//!     let current = services::get_doctor_schedule(&repo, doctor.id).await?;
//!     println!("{} entries", current.schedules.len());
//!     Ok(())
//! }
//! ```

use log::{debug, info, warn};

use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::api::DoctorId;
use crate::models::{parse_calendar_date, Doctor};
use crate::routes::schedule::{
    DeleteScheduleQuery, DeleteScheduleResponse, DoctorScheduleResponse, ScheduleUpdateRequest,
};
use crate::services::{build_schedule, ValidationErrors};

/// Errors surfaced by the schedule services.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleServiceError {
    /// The request was rejected before touching storage.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ValidationErrors> for ScheduleServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl ScheduleServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(e) if e.is_not_found())
    }
}

pub type ServiceResult<T> = Result<T, ScheduleServiceError>;

// ==================== Health & Connection ====================

/// Pass-through to the repository's health check.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Doctor Registry ====================

/// Register a doctor with default scheduling preferences.
///
/// The name is trimmed; a blank name is a validation error on `display_name`.
pub async fn create_doctor<R: FullRepository + ?Sized>(
    repo: &R,
    display_name: &str,
) -> ServiceResult<Doctor> {
    let name = display_name.trim();
    if name.is_empty() {
        return Err(ValidationErrors::single("display_name", "is required").into());
    }

    let doctor = repo.create_doctor(name).await?;
    info!("Registered doctor {} ({})", doctor.id, doctor.display_name);
    Ok(doctor)
}

pub async fn get_doctor<R: FullRepository + ?Sized>(
    repo: &R,
    doctor_id: DoctorId,
) -> RepositoryResult<Doctor> {
    repo.get_doctor(doctor_id).await
}

pub async fn list_doctors<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Doctor>> {
    repo.list_doctors().await
}

// ==================== Schedule Operations ====================

/// Current preferences and schedule entries of a doctor.
pub async fn get_doctor_schedule<R: FullRepository + ?Sized>(
    repo: &R,
    doctor_id: DoctorId,
) -> RepositoryResult<DoctorScheduleResponse> {
    let doctor = repo.get_doctor(doctor_id).await?;
    let entries = repo.list_doctor_schedule(doctor_id).await?;
    Ok(DoctorScheduleResponse::new(&doctor, entries))
}

/// Validate a schedule update and regenerate the doctor's schedule.
///
/// 1. Load the doctor (404 if unknown); its stored preferences supply the
///    defaults the request omits
/// 2. Validate the whole request, collecting every violation
/// 3. Expand the validated plan into concrete entries
/// 4. Replace preferences and entries in one repository transaction
///
/// Nothing is written when validation fails or the transaction is rolled
/// back. Failures are returned as-is; there are no retries.
pub async fn regenerate_schedule<R: FullRepository + ?Sized>(
    repo: &R,
    doctor_id: DoctorId,
    request: &ScheduleUpdateRequest,
) -> ServiceResult<DoctorScheduleResponse> {
    let doctor = repo.get_doctor(doctor_id).await?;

    let (preferences, entries) = match build_schedule(&doctor, request) {
        Ok(built) => built,
        Err(errors) => {
            warn!(
                "Rejected schedule update for doctor {}: {} invalid field(s)",
                doctor_id,
                errors.len()
            );
            return Err(errors.into());
        }
    };
    debug!(
        "Generated {} schedule entries for doctor {} ({})",
        entries.len(),
        doctor_id,
        preferences.frequency_mode
    );

    let stored = repo
        .replace_doctor_schedule(doctor_id, &preferences, &entries)
        .await
        .map_err(|e| {
            warn!("Schedule replacement for doctor {} failed: {}", doctor_id, e);
            e
        })?;

    info!(
        "Replaced schedule of doctor {} with {} entries",
        doctor_id,
        stored.len()
    );

    let updated = Doctor {
        preferences,
        ..doctor
    };
    Ok(DoctorScheduleResponse::new(&updated, stored))
}

/// Remove every entry of a doctor on the date given in the query string.
///
/// A missing or malformed date is a validation error on `date`; a date with
/// no entries is `NotFound`.
pub async fn delete_schedule_for_date<R: FullRepository + ?Sized>(
    repo: &R,
    doctor_id: DoctorId,
    query: &DeleteScheduleQuery,
) -> ServiceResult<DeleteScheduleResponse> {
    let date = match query.date.as_deref().map(str::trim) {
        None | Some("") => return Err(ValidationErrors::single("date", "is required").into()),
        Some(raw) => parse_calendar_date(raw).ok_or_else(|| {
            ValidationErrors::single("date", format!("'{}' is not a valid YYYY-MM-DD date", raw))
        })?,
    };

    let deleted = repo.delete_schedule_for_date(doctor_id, date).await?;
    info!(
        "Deleted {} schedule entries of doctor {} on {}",
        deleted, doctor_id, date
    );

    Ok(DeleteScheduleResponse {
        doctor_id,
        date,
        deleted,
    })
}
