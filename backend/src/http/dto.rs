//! Data Transfer Objects for the HTTP API.
//!
//! Resource bodies live in `routes` and are re-exported here; only the
//! server-level responses are defined locally.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    // Doctors
    CreateDoctorRequest, DoctorInfo, DoctorListResponse,
    // Options
    OptionEntry, ScheduleOptions,
    // Schedule
    CustomDateInput, DeleteScheduleQuery, DeleteScheduleResponse, DoctorScheduleResponse,
    RecurringScheduleInput, ScheduleUpdateRequest, ShiftWindowInput,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Storage backend status
    pub database: String,
}
