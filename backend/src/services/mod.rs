//! Service layer for schedule business logic.
//!
//! This module contains the pure logic that sits between the HTTP handlers
//! and the repository layer: request validation and schedule generation.
//! Nothing here touches storage; orchestration with the repository lives in
//! [`crate::db::services`].

pub mod schedule_generator;
pub mod validation;

pub use schedule_generator::{
    build_schedule, generate_entries, patients_per_slot, resolve_patients_per_slot,
    validate_request, SchedulePlan, ValidatedSchedule,
};
pub use validation::ValidationErrors;
