//! # Clinic Schedule Backend
//!
//! Doctor availability schedules for the clinic admin backend.
//!
//! An administrator describes a doctor's availability either as a weekly
//! template (day of week, morning or afternoon, start and end time) or as a
//! list of specific calendar dates. This crate validates that description,
//! derives how many patients fit into each slot, and atomically replaces the
//! doctor's stored schedule.
//!
//! ## Architecture
//!
//! - [`api`]: Identifier types and re-exported request/response types
//! - [`models`]: Domain types, enum display tables, and time helpers
//! - [`services`]: Request validation and schedule generation (pure)
//! - [`db`]: Repository traits, Postgres and in-memory backends, service layer
//! - [`routes`]: Request and response bodies per resource
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Features
//!
//! - `local-repo` (default): in-memory repository
//! - `postgres-repo`: Postgres via Diesel, with embedded migrations
//! - `http-server` (default): axum REST API and the `clinic-server` binary

// RepositoryError carries an ErrorContext on every variant.
#![allow(clippy::result_large_err)]

pub mod api;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
