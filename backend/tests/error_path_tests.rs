//! Error path testing for db/services.rs and db/repository/error.rs.
//!
//! These tests trigger failures in the in-memory backend and check that the
//! error kind and context survive propagation through the service layer.

mod support;

use clinic_schedule::api::{DeleteScheduleQuery, DoctorId};
use clinic_schedule::db::repository::{ErrorContext, RepositoryError, ScheduleRepository};
use clinic_schedule::db::services::{self, ScheduleServiceError};
use clinic_schedule::models::DoctorSchedulingPreferences;

use support::{repo_with_doctor, weekly_request, weekly_row};

// =========================================================
// Not found
// =========================================================

#[tokio::test]
async fn test_not_found_context_names_doctor_and_operation() {
    let (repo, _) = repo_with_doctor("Dr. Nuñez");
    let err = repo
        .replace_doctor_schedule(DoctorId::new(77), &DoctorSchedulingPreferences::default(), &[])
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let ctx = err.context();
    assert_eq!(ctx.operation.as_deref(), Some("replace_doctor_schedule"));
    assert_eq!(ctx.entity.as_deref(), Some("doctor"));
    assert_eq!(ctx.entity_id.as_deref(), Some("77"));
}

#[tokio::test]
async fn test_delete_not_found_context_names_date() {
    let (repo, doctor) = repo_with_doctor("Dr. Nuñez");
    let query = DeleteScheduleQuery {
        date: Some("2024-02-29".to_string()),
    };
    let err = services::delete_schedule_for_date(&repo, doctor.id, &query)
        .await
        .unwrap_err();

    match err {
        ScheduleServiceError::Repository(e) => {
            assert!(e.is_not_found());
            assert_eq!(e.context().entity.as_deref(), Some("schedule_entry"));
            assert!(e.to_string().contains("2024-02-29"));
        }
        other => panic!("expected repository error, got {:?}", other),
    }
}

// =========================================================
// Unhealthy backend
// =========================================================

#[tokio::test]
async fn test_unhealthy_backend_fails_every_operation() {
    let (repo, doctor) = repo_with_doctor("Dr. Nuñez");
    repo.set_healthy(false);

    assert!(!services::health_check(&repo).await.unwrap());

    let err = services::get_doctor_schedule(&repo, doctor.id)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConnectionError { .. }));

    let request = weekly_request(vec![weekly_row("monday", "morning", "08:00", "12:00", 2)]);
    let err = services::regenerate_schedule(&repo, doctor.id, &request)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScheduleServiceError::Repository(RepositoryError::ConnectionError { .. })
    ));

    repo.set_healthy(true);
    services::regenerate_schedule(&repo, doctor.id, &request)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_doctor_on_unhealthy_backend() {
    let (repo, _) = repo_with_doctor("Dr. Nuñez");
    repo.set_healthy(false);

    let err = services::create_doctor(&repo, "Dr. Ramos").await.unwrap_err();
    assert!(matches!(err, ScheduleServiceError::Repository(_)));
    assert_eq!(repo.doctor_count(), 1);
}

// =========================================================
// Faults and error rendering
// =========================================================

#[tokio::test]
async fn test_write_fault_is_transaction_error_with_context() {
    let (repo, doctor) = repo_with_doctor("Dr. Nuñez");
    repo.inject_write_faults(2);

    let request = weekly_request(vec![weekly_row("monday", "morning", "08:00", "12:00", 2)]);
    for _ in 0..2 {
        let err = services::regenerate_schedule(&repo, doctor.id, &request)
            .await
            .unwrap_err();
        match err {
            ScheduleServiceError::Repository(RepositoryError::TransactionError {
                context, ..
            }) => {
                assert_eq!(context.operation.as_deref(), Some("replace_doctor_schedule"));
            }
            other => panic!("expected transaction error, got {:?}", other),
        }
    }
    assert_eq!(repo.entry_count(), 0);

    services::regenerate_schedule(&repo, doctor.id, &request)
        .await
        .unwrap();
    assert_eq!(repo.entry_count(), 1);
}

#[test]
fn test_service_error_display() {
    let err: ScheduleServiceError = RepositoryError::not_found_with_context(
        "Doctor 9 not found",
        ErrorContext::new("get_doctor").with_entity("doctor").with_entity_id(9),
    )
    .into();
    assert_eq!(
        err.to_string(),
        "Not found: Doctor 9 not found [operation=get_doctor, entity=doctor, id=9]"
    );
    assert!(err.is_not_found());
}
