//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer in `db::services`. A `doctor_id` that is not an integer is
//! rejected with a JSON 400 before any lookup.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use super::dto::{
    CreateDoctorRequest, DeleteScheduleQuery, DeleteScheduleResponse, DoctorInfo,
    DoctorListResponse, DoctorScheduleResponse, HealthResponse, ScheduleOptions,
    ScheduleUpdateRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::DoctorId;
use crate::db::services as db_services;
use crate::routes::options::GET_SCHEDULE_OPTIONS;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Doctors
// =============================================================================

/// GET /v1/doctors
pub async fn list_doctors(State(state): State<AppState>) -> HandlerResult<DoctorListResponse> {
    let doctors: Vec<DoctorInfo> = db_services::list_doctors(state.repository.as_ref())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = doctors.len();

    Ok(Json(DoctorListResponse { doctors, total }))
}

/// POST /v1/doctors
///
/// Registers a doctor with default scheduling preferences.
pub async fn create_doctor(
    State(state): State<AppState>,
    payload: Result<Json<CreateDoctorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DoctorInfo>), AppError> {
    let Json(request) = payload?;
    let name = request.display_name.unwrap_or_default();
    let doctor = db_services::create_doctor(state.repository.as_ref(), &name).await?;

    Ok((StatusCode::CREATED, Json(doctor.into())))
}

/// GET /v1/doctors/{doctor_id}
pub async fn get_doctor(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> HandlerResult<DoctorInfo> {
    let Path(doctor_id) = path?;
    let doctor =
        db_services::get_doctor(state.repository.as_ref(), DoctorId::new(doctor_id)).await?;
    Ok(Json(doctor.into()))
}

// =============================================================================
// Doctor Schedule
// =============================================================================

/// GET /v1/doctors/{doctor_id}/schedule
pub async fn get_doctor_schedule(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> HandlerResult<DoctorScheduleResponse> {
    let Path(doctor_id) = path?;
    let response =
        db_services::get_doctor_schedule(state.repository.as_ref(), DoctorId::new(doctor_id))
            .await?;
    Ok(Json(response))
}

/// PUT /v1/doctors/{doctor_id}/schedule
///
/// Validates the body and replaces the doctor's preferences and schedule
/// entries in one transaction.
pub async fn put_doctor_schedule(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ScheduleUpdateRequest>, JsonRejection>,
) -> HandlerResult<DoctorScheduleResponse> {
    let Path(doctor_id) = path?;
    let Json(request) = payload?;
    let doctor_id = DoctorId::new(doctor_id);
    debug!(%doctor_id, "Schedule update received");

    let response =
        db_services::regenerate_schedule(state.repository.as_ref(), doctor_id, &request).await?;
    info!(
        %doctor_id,
        entries = response.schedules.len(),
        "Schedule regenerated"
    );

    Ok(Json(response))
}

/// DELETE /v1/doctors/{doctor_id}/schedule?date=YYYY-MM-DD
pub async fn delete_schedule_date(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Query(query): Query<DeleteScheduleQuery>,
) -> HandlerResult<DeleteScheduleResponse> {
    let Path(doctor_id) = path?;
    let response = db_services::delete_schedule_for_date(
        state.repository.as_ref(),
        DoctorId::new(doctor_id),
        &query,
    )
    .await?;
    Ok(Json(response))
}

// =============================================================================
// Options
// =============================================================================

/// GET /v1/schedule-options
///
/// Labels, colors and icons for every frequency, weekday and shift.
pub async fn get_schedule_options() -> Json<ScheduleOptions> {
    debug!(operation = GET_SCHEDULE_OPTIONS, "Serving option catalogue");
    Json(ScheduleOptions::catalogue())
}
