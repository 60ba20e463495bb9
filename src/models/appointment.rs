use serde::{Deserialize, Serialize};

use super::patient::Patient;
use crate::api::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    Initial,
    FollowUp,
    Emergency,
    Consultation,
}

impl AppointmentType {
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentType::Initial => "Primera vez",
            AppointmentType::FollowUp => "Seguimiento",
            AppointmentType::Emergency => "Emergencia",
            AppointmentType::Consultation => "Consulta",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub doctor_id: String,
    pub scheduled_date: String,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    pub appointment_type: AppointmentType,
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub patient: Option<Patient>,
    pub patient_name: Option<String>,
}

impl Resource for Appointment {
    const PATH: &'static str = "/appointments";
    const SINGULAR: &'static str = "appointment";
    const PLURAL: &'static str = "appointments";
    const LABEL: &'static str = "cita";
    const LABEL_PLURAL: &'static str = "citas";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<AppointmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snake_case_enums_round_trip() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": "a1",
            "patient_id": "p1",
            "scheduled_date": "2024-06-15T09:00:00Z",
            "duration_minutes": 50,
            "status": "no_show",
            "appointment_type": "follow_up",
            "patient_name": "Ana Gómez"
        }))
        .unwrap();

        assert_eq!(appt.status, AppointmentStatus::NoShow);
        assert_eq!(appt.appointment_type.label(), "Seguimiento");
        assert!(appt.patient.is_none());
        assert_eq!(AppointmentStatus::Scheduled.as_str(), "scheduled");
    }
}
