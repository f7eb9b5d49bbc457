//! HTTP API tests driving the real router with `tower::ServiceExt::oneshot`.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use clinic_schedule::db::repositories::LocalRepository;
use clinic_schedule::db::repository::FullRepository;
use clinic_schedule::http::{create_router, AppState};

fn app(repo: &LocalRepository) -> Router {
    let repository = Arc::new(repo.clone()) as Arc<dyn FullRepository>;
    create_router(AppState::new(repository))
}

async fn send(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn timed_monthly_body() -> Value {
    json!({
        "frequency": "monthly",
        "patients_based_on_time": true,
        "time_slot": 15,
        "customDates": [
            {
                "date": "2024-03-15",
                "morning": { "start_time": "09:00", "end_time": "10:00" },
                "afternoon": { "start_time": "09:00", "end_time": "09:10" }
            }
        ]
    })
}

#[tokio::test]
async fn test_health() {
    let repo = LocalRepository::new();
    let (status, body) = send(app(&repo), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");

    repo.set_healthy(false);
    let (_, body) = send(app(&repo), Method::GET, "/health", None).await;
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_create_and_list_doctors() {
    let repo = LocalRepository::new();

    let (status, body) = send(
        app(&repo),
        Method::POST,
        "/v1/doctors",
        Some(json!({ "display_name": "Dr. Elena Mora" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["display_name"], "Dr. Elena Mora");
    assert_eq!(body["frequency"], "weekly");
    let id = body["doctor_id"].as_i64().unwrap();

    let (status, body) = send(app(&repo), Method::GET, "/v1/doctors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let (status, body) = send(app(&repo), Method::GET, &format!("/v1/doctors/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["doctor_id"], id);
}

#[tokio::test]
async fn test_create_doctor_blank_name_is_422() {
    let repo = LocalRepository::new();
    let (status, body) = send(
        app(&repo),
        Method::POST,
        "/v1/doctors",
        Some(json!({ "display_name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["errors"]["display_name"].is_array());
}

#[tokio::test]
async fn test_put_then_get_schedule() {
    let repo = LocalRepository::new();
    let doctor = repo.seed_doctor("Dr. Ríos");
    let uri = format!("/v1/doctors/{}/schedule", doctor.id);

    let (status, body) = send(app(&repo), Method::PUT, &uri, Some(timed_monthly_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["frequency"], "monthly");
    assert_eq!(body["time_slot"], 15);
    assert_eq!(body["schedules"][0]["patients_per_slot"], 4);
    assert_eq!(body["schedules"][1]["patients_per_slot"], 0);
    assert_eq!(body["schedules"][0]["day_of_week"], "friday");
    assert_eq!(body["schedules"][0]["date"], "2024-03-15");

    let (status, fetched) = send(app(&repo), Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["schedules"], body["schedules"]);
    assert_eq!(fetched["doctor_name"], "Dr. Ríos");
}

#[tokio::test]
async fn test_put_recurring_schedule() {
    let repo = LocalRepository::new();
    let doctor = repo.seed_doctor("Dr. Ríos");
    let body = json!({
        "frequency": "weekly",
        "schedules": [
            { "day_of_week": "monday", "shift_period": "morning",
              "start_time": "08:00", "end_time": "12:00", "patients_per_slot": 3 },
            { "day_of_week": "Saturday", "shift_period": "AFTERNOON",
              "start_time": "14:00:00", "end_time": "17:30:00", "patients_per_slot": 1 }
        ]
    });

    let (status, response) = send(
        app(&repo),
        Method::PUT,
        &format!("/v1/doctors/{}/schedule", doctor.id),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = response["schedules"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["day_of_week"], "saturday");
    assert_eq!(rows[1]["shift_period"], "afternoon");
    assert_eq!(rows[1]["end_time"], "17:30");
    assert!(rows[1]["date"].is_null());
}

#[tokio::test]
async fn test_put_invalid_schedule_is_422_with_field_errors() {
    let repo = LocalRepository::new();
    let doctor = repo.seed_doctor("Dr. Ríos");
    let body = json!({
        "frequency": "weekly",
        "schedules": [
            { "day_of_week": "monday", "shift_period": "morning",
              "start_time": "12:00", "end_time": "08:00", "patients_per_slot": 3 }
        ]
    });

    let (status, response) = send(
        app(&repo),
        Method::PUT,
        &format!("/v1/doctors/{}/schedule", doctor.id),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response["errors"]["schedules.0.end_time"].is_array());
    assert_eq!(repo.entry_count(), 0);
}

#[tokio::test]
async fn test_put_malformed_json_is_422_on_body() {
    let repo = LocalRepository::new();
    let doctor = repo.seed_doctor("Dr. Ríos");
    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/v1/doctors/{}/schedule", doctor.id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"frequency\": "))
        .unwrap();

    let response = app(&repo).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["errors"]["body"].is_array());
}

#[tokio::test]
async fn test_put_unknown_doctor_is_404() {
    let repo = LocalRepository::new();
    let (status, body) = send(
        app(&repo),
        Method::PUT,
        "/v1/doctors/999/schedule",
        Some(timed_monthly_body()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_non_numeric_doctor_id_is_400() {
    let repo = LocalRepository::new();

    let (status, body) = send(app(&repo), Method::GET, "/v1/doctors/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = send(
        app(&repo),
        Method::PUT,
        "/v1/doctors/abc/schedule",
        Some(timed_monthly_body()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(repo.entry_count(), 0);
}

#[tokio::test]
async fn test_storage_fault_is_500_and_keeps_schedule() {
    let repo = LocalRepository::new();
    let doctor = repo.seed_doctor("Dr. Ríos");
    let uri = format!("/v1/doctors/{}/schedule", doctor.id);
    send(app(&repo), Method::PUT, &uri, Some(timed_monthly_body())).await;

    repo.inject_write_faults(1);
    let (status, body) = send(app(&repo), Method::PUT, &uri, Some(timed_monthly_body())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "REPOSITORY_ERROR");
    assert_eq!(repo.entry_count(), 2);
}

#[tokio::test]
async fn test_delete_schedule_date() {
    let repo = LocalRepository::new();
    let doctor = repo.seed_doctor("Dr. Ríos");
    let uri = format!("/v1/doctors/{}/schedule", doctor.id);
    send(app(&repo), Method::PUT, &uri, Some(timed_monthly_body())).await;

    let (status, body) = send(app(&repo), Method::DELETE, &format!("{}?date=2024-03-15", uri), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 2);
    assert_eq!(body["date"], "2024-03-15");

    let (status, _) = send(app(&repo), Method::DELETE, &format!("{}?date=2024-03-15", uri), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(app(&repo), Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["date"].is_array());
}

#[tokio::test]
async fn test_schedule_options() {
    let repo = LocalRepository::new();
    let (status, body) = send(app(&repo), Method::GET, "/v1/schedule-options", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["frequencies"].as_array().unwrap().len(), 3);
    assert_eq!(body["days_of_week"].as_array().unwrap().len(), 7);
    assert_eq!(body["shift_periods"][0]["value"], "morning");
    assert!(body["shift_periods"][0]["color"].is_string());
}
