use serde::{Deserialize, Serialize};

use crate::api::DoctorId;
use crate::models::{Doctor, FrequencyMode};

/// Doctor summary used in listings and lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorInfo {
    pub doctor_id: DoctorId,
    pub display_name: String,
    pub frequency: FrequencyMode,
    pub patients_based_on_time: bool,
    pub time_slot: Option<u32>,
}

impl From<Doctor> for DoctorInfo {
    fn from(doctor: Doctor) -> Self {
        Self {
            doctor_id: doctor.id,
            display_name: doctor.display_name,
            frequency: doctor.preferences.frequency_mode,
            patients_based_on_time: doctor.preferences.patients_based_on_time,
            time_slot: doctor.preferences.time_slot_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorListResponse {
    pub doctors: Vec<DoctorInfo>,
    pub total: usize,
}

/// Body of `POST /v1/doctors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    #[serde(default)]
    pub display_name: Option<String>,
}

pub const LIST_DOCTORS: &str = "list_doctors";
pub const CREATE_DOCTOR: &str = "create_doctor";
pub const GET_DOCTOR: &str = "get_doctor";
