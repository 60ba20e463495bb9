use serde::{Deserialize, Serialize};

use super::patient::Patient;
use crate::api::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Mild => "Leve",
            Severity::Moderate => "Moderado",
            Severity::Severe => "Severo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisStatus {
    Active,
    Resolved,
    Chronic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub doctor_id: String,
    pub diagnosis_code: String,
    pub diagnosis_name: String,
    #[serde(default)]
    pub diagnosis_text: String,
    pub severity: Severity,
    pub status: DiagnosisStatus,
    pub icd_code: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub patient: Option<Patient>,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
}

impl Resource for Diagnosis {
    const PATH: &'static str = "/diagnoses";
    const SINGULAR: &'static str = "diagnosis";
    const PLURAL: &'static str = "diagnoses";
    const LABEL: &'static str = "diagnóstico";
    const LABEL_PLURAL: &'static str = "diagnósticos";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosisForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DiagnosisStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icd_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
}
