use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::format::{calculate_age, parse_api_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Masculino",
            Gender::Female => "Femenino",
            Gender::Other => "Otro",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Age on `today`, or `None` when the stored birth date is not `YYYY-MM-DD`.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        let birth = parse_api_date(&self.date_of_birth)?;
        Some(calculate_age(birth, today))
    }
}

impl Resource for Patient {
    const PATH: &'static str = "/patients";
    const SINGULAR: &'static str = "patient";
    const PLURAL: &'static str = "patients";
    const LABEL: &'static str = "paciente";
    const LABEL_PLURAL: &'static str = "pacientes";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Body for creating or updating a patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patient() -> Patient {
        serde_json::from_value(json!({
            "id": "p1",
            "first_name": "Ana",
            "last_name": "Gómez",
            "date_of_birth": "2000-06-15T00:00:00.000Z",
            "gender": "F",
            "doctor_id": "d1"
        }))
        .unwrap()
    }

    #[test]
    fn deserializes_minimal_record() {
        let p = patient();
        assert_eq!(p.gender, Gender::Female);
        assert!(p.phone.is_none());
        assert_eq!(p.full_name(), "Ana Gómez");
    }

    #[test]
    fn age_uses_date_prefix() {
        let p = patient();
        let today = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        assert_eq!(p.age_on(today), Some(23));
    }

    #[test]
    fn partial_form_only_sends_set_fields() {
        let form = PatientForm {
            phone: Some("3001234567".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&form).unwrap(), json!({"phone": "3001234567"}));
    }
}
