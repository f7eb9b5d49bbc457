//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic migration execution
//! - Row-locked, transactional schedule replacement
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//!
//! Failed operations are never retried; the error is returned to the caller.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;

use crate::api::{DoctorId, ScheduleEntryId};
use crate::db::repository::{
    DoctorRepository, ErrorContext, RepositoryError, RepositoryResult, ScheduleRepository,
};
use crate::models::{
    Describe, Doctor, DoctorSchedulingPreferences, FrequencyMode, NewScheduleEntry,
    ScheduleEntry,
};
use crate::routes::doctors::{CREATE_DOCTOR, GET_DOCTOR, LIST_DOCTORS};
use crate::routes::schedule::{DELETE_SCHEDULE_DATE, GET_DOCTOR_SCHEDULE, PUT_DOCTOR_SCHEDULE};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Run a blocking Diesel operation on a pooled connection.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(RepositoryError::from)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn doctor_not_found(doctor_id: DoctorId, operation: &str) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Doctor {} not found", doctor_id),
        ErrorContext::new(operation)
            .with_entity("doctor")
            .with_entity_id(doctor_id),
    )
}

/// Map a lookup error, turning Diesel's `NotFound` into a doctor-specific one.
fn doctor_lookup_error(err: diesel::result::Error, doctor_id: DoctorId, operation: &str) -> RepositoryError {
    match err {
        diesel::result::Error::NotFound => doctor_not_found(doctor_id, operation),
        other => map_diesel_error(other).with_operation(operation),
    }
}

/// Checked conversion into an `INTEGER` column; out-of-range counts are an error.
fn to_db_count(value: u32, column: &str) -> RepositoryResult<i32> {
    i32::try_from(value).map_err(|_| {
        RepositoryError::internal_with_context(
            format!("{} does not fit an INTEGER column", value),
            ErrorContext::default().with_details(format!("column={}", column)),
        )
    })
}

fn from_db_count(value: i32, column: &str) -> RepositoryResult<u32> {
    u32::try_from(value).map_err(|_| {
        RepositoryError::internal_with_context(
            format!("negative count {}", value),
            ErrorContext::default().with_details(format!("column={}", column)),
        )
    })
}

fn parse_column<T>(value: &str, column: &str) -> RepositoryResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse::<T>().map_err(|e| {
        RepositoryError::internal_with_context(
            e,
            ErrorContext::default().with_details(format!("column={}", column)),
        )
    })
}

fn row_to_doctor(row: DoctorRow) -> RepositoryResult<Doctor> {
    Ok(Doctor {
        id: DoctorId::new(row.doctor_id),
        display_name: row.display_name,
        preferences: DoctorSchedulingPreferences {
            frequency_mode: parse_column(&row.frequency_mode, "frequency_mode")?,
            patients_based_on_time: row.patients_based_on_time,
            time_slot_minutes: row
                .time_slot_minutes
                .map(|v| from_db_count(v, "time_slot_minutes"))
                .transpose()?,
            patients_per_day: row
                .patients_per_day
                .map(|v| from_db_count(v, "patients_per_day"))
                .transpose()?,
        },
    })
}

fn row_to_entry(row: ScheduleRow) -> RepositoryResult<ScheduleEntry> {
    Ok(ScheduleEntry {
        id: ScheduleEntryId::new(row.schedule_entry_id),
        doctor_id: DoctorId::new(row.doctor_id),
        date: row.schedule_date,
        day_of_week: parse_column(&row.day_of_week, "day_of_week")?,
        shift_period: parse_column(&row.shift_period, "shift_period")?,
        start_time: row.start_time,
        end_time: row.end_time,
        patients_per_slot: from_db_count(row.patients_per_slot, "patients_per_slot")?,
        is_active: row.is_active,
    })
}

fn entry_to_row(doctor_id: DoctorId, entry: &NewScheduleEntry) -> RepositoryResult<NewScheduleRow> {
    Ok(NewScheduleRow {
        doctor_id: doctor_id.value(),
        schedule_date: entry.date,
        day_of_week: entry.day_of_week.as_str().to_string(),
        shift_period: entry.shift_period.as_str().to_string(),
        start_time: entry.start_time,
        end_time: entry.end_time,
        patients_per_slot: to_db_count(entry.patients_per_slot, "patients_per_slot")?,
        is_active: entry.is_active,
    })
}

fn optional_db_count(value: Option<u32>, column: &str) -> RepositoryResult<Option<i32>> {
    value.map(|v| to_db_count(v, column)).transpose()
}

#[async_trait]
impl DoctorRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn create_doctor(&self, display_name: &str) -> RepositoryResult<Doctor> {
        let defaults = DoctorSchedulingPreferences::default();
        let new_row = NewDoctorRow {
            display_name: display_name.to_string(),
            frequency_mode: defaults.frequency_mode.as_str().to_string(),
            patients_based_on_time: defaults.patients_based_on_time,
            time_slot_minutes: optional_db_count(defaults.time_slot_minutes, "time_slot_minutes")?,
            patients_per_day: optional_db_count(defaults.patients_per_day, "patients_per_day")?,
        };

        self.with_conn(move |conn| {
            let row: DoctorRow = diesel::insert_into(doctors::table)
                .values(&new_row)
                .returning(DoctorRow::as_returning())
                .get_result(conn)
                .map_err(|e| map_diesel_error(e).with_operation(CREATE_DOCTOR))?;
            row_to_doctor(row)
        })
        .await
    }

    async fn get_doctor(&self, doctor_id: DoctorId) -> RepositoryResult<Doctor> {
        self.with_conn(move |conn| {
            let row = doctors::table
                .find(doctor_id.value())
                .select(DoctorRow::as_select())
                .first::<DoctorRow>(conn)
                .map_err(|e| doctor_lookup_error(e, doctor_id, GET_DOCTOR))?;
            row_to_doctor(row)
        })
        .await
    }

    async fn list_doctors(&self) -> RepositoryResult<Vec<Doctor>> {
        self.with_conn(|conn| {
            let rows = doctors::table
                .order(doctors::doctor_id.asc())
                .select(DoctorRow::as_select())
                .load::<DoctorRow>(conn)
                .map_err(|e| map_diesel_error(e).with_operation(LIST_DOCTORS))?;
            rows.into_iter().map(row_to_doctor).collect()
        })
        .await
    }
}

#[async_trait]
impl ScheduleRepository for PostgresRepository {
    async fn list_doctor_schedule(
        &self,
        doctor_id: DoctorId,
    ) -> RepositoryResult<Vec<ScheduleEntry>> {
        self.with_conn(move |conn| {
            doctors::table
                .find(doctor_id.value())
                .select(doctors::doctor_id)
                .first::<i64>(conn)
                .map_err(|e| doctor_lookup_error(e, doctor_id, GET_DOCTOR_SCHEDULE))?;

            let rows = doctor_schedules::table
                .filter(doctor_schedules::doctor_id.eq(doctor_id.value()))
                .order(doctor_schedules::schedule_entry_id.asc())
                .select(ScheduleRow::as_select())
                .load::<ScheduleRow>(conn)
                .map_err(map_diesel_error)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }

    async fn replace_doctor_schedule(
        &self,
        doctor_id: DoctorId,
        preferences: &DoctorSchedulingPreferences,
        entries: &[NewScheduleEntry],
    ) -> RepositoryResult<Vec<ScheduleEntry>> {
        let frequency_mode: FrequencyMode = preferences.frequency_mode;
        let patients_based_on_time = preferences.patients_based_on_time;
        let time_slot_minutes =
            optional_db_count(preferences.time_slot_minutes, "time_slot_minutes")?;
        let patients_per_day = optional_db_count(preferences.patients_per_day, "patients_per_day")?;
        let new_rows = entries
            .iter()
            .map(|e| entry_to_row(doctor_id, e))
            .collect::<RepositoryResult<Vec<NewScheduleRow>>>()
            .map_err(|e| {
                e.with_operation(PUT_DOCTOR_SCHEDULE)
                    .with_entity("doctor", doctor_id)
            })?;

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                // Serializes concurrent replacements for the same doctor.
                doctors::table
                    .find(doctor_id.value())
                    .select(doctors::doctor_id)
                    .for_update()
                    .first::<i64>(tx)
                    .map_err(|e| doctor_lookup_error(e, doctor_id, PUT_DOCTOR_SCHEDULE))?;

                diesel::update(doctors::table.find(doctor_id.value()))
                    .set((
                        doctors::frequency_mode.eq(frequency_mode.as_str()),
                        doctors::patients_based_on_time.eq(patients_based_on_time),
                        doctors::time_slot_minutes.eq(time_slot_minutes),
                        doctors::patients_per_day.eq(patients_per_day),
                        doctors::updated_at.eq(Utc::now()),
                    ))
                    .execute(tx)
                    .map_err(map_diesel_error)?;

                diesel::delete(
                    doctor_schedules::table
                        .filter(doctor_schedules::doctor_id.eq(doctor_id.value())),
                )
                .execute(tx)
                .map_err(map_diesel_error)?;

                if new_rows.is_empty() {
                    return Ok(Vec::new());
                }

                let inserted = diesel::insert_into(doctor_schedules::table)
                    .values(&new_rows)
                    .returning(ScheduleRow::as_returning())
                    .get_results::<ScheduleRow>(tx)
                    .map_err(map_diesel_error)?;

                inserted.into_iter().map(row_to_entry).collect()
            })
            .map_err(|e: RepositoryError| {
                e.with_operation(PUT_DOCTOR_SCHEDULE)
                    .with_entity("doctor", doctor_id)
            })
        })
        .await
    }

    async fn delete_schedule_for_date(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> RepositoryResult<usize> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                doctors::table
                    .find(doctor_id.value())
                    .select(doctors::doctor_id)
                    .first::<i64>(tx)
                    .map_err(|e| doctor_lookup_error(e, doctor_id, DELETE_SCHEDULE_DATE))?;

                let deleted = diesel::delete(
                    doctor_schedules::table
                        .filter(doctor_schedules::doctor_id.eq(doctor_id.value()))
                        .filter(doctor_schedules::schedule_date.eq(date)),
                )
                .execute(tx)
                .map_err(map_diesel_error)?;

                if deleted == 0 {
                    return Err(RepositoryError::not_found_with_context(
                        format!("No schedule entry for doctor {} on {}", doctor_id, date),
                        ErrorContext::new(DELETE_SCHEDULE_DATE)
                            .with_entity("schedule_entry")
                            .with_entity_id(format!("{}@{}", doctor_id, date)),
                    ));
                }
                Ok(deleted)
            })
        })
        .await
    }
}
