//! Repository trait definitions for database operations.
//!
//! This module provides focused repository traits that abstract storage.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`doctor`]: Doctor records and their scheduling preferences
//! - [`schedule`]: Schedule rows, including the atomic replace-all
//!
//! # Convenience Trait Bound
//!
//! For functions that need every repository capability, use the
//! [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let doctor = repo.get_doctor(doctor_id).await?;
//!     repo.replace_doctor_schedule(doctor.id, &prefs, &entries).await?;
//!     Ok(())
//! }
//! ```

pub mod doctor;
pub mod error;
pub mod schedule;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use doctor::DoctorRepository;
pub use schedule::ScheduleRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements every
/// repository trait.
pub trait FullRepository: DoctorRepository + ScheduleRepository {}

// Blanket implementation: any type implementing both traits automatically implements FullRepository
impl<T> FullRepository for T where T: DoctorRepository + ScheduleRepository {}
