//! Public API surface for the clinic schedule backend.
//!
//! This file consolidates the identifier types and the DTOs used by the
//! HTTP layer. All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::{
    DayOfWeek, DisplayMeta, Doctor, DoctorSchedulingPreferences, FrequencyMode, NewScheduleEntry,
    ScheduleEntry, ShiftPeriod,
};
pub use crate::routes::doctors::{CreateDoctorRequest, DoctorInfo, DoctorListResponse};
pub use crate::routes::options::{OptionEntry, ScheduleOptions};
pub use crate::routes::schedule::{
    CustomDateInput, DeleteScheduleQuery, DeleteScheduleResponse, DoctorScheduleResponse,
    RecurringScheduleInput, ScheduleUpdateRequest, ShiftWindowInput,
};

crate::define_id_type!(i64, DoctorId);
crate::define_id_type!(i64, ScheduleEntryId);
