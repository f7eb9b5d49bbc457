//! HTTP server module.
//!
//! An axum-based REST API over the service layer and repository pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! │  - JSON extraction, 422 bodies for invalid input         │
//! │  - CORS, compression, request tracing                    │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (db::services)                            │
//! │  - validation and schedule generation                    │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                  │
//! │  - LocalRepository / PostgresRepository                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Endpoints
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/health` | storage status |
//! | GET, POST | `/v1/doctors` | list / register doctors |
//! | GET | `/v1/doctors/{doctor_id}` | one doctor |
//! | GET, PUT | `/v1/doctors/{doctor_id}/schedule` | read / regenerate schedule |
//! | DELETE | `/v1/doctors/{doctor_id}/schedule?date=YYYY-MM-DD` | drop one date |
//! | GET | `/v1/schedule-options` | enum labels and colors |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
