use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_patients: u64,
    pub total_appointments: u64,
    pub upcoming_appointments: u64,
    pub completed_appointments: u64,
    pub active_diagnoses: u64,
    pub pending_payments: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisStats {
    pub total_diagnoses: u64,
    pub active_diagnoses: u64,
    pub resolved_diagnoses: u64,
    pub chronic_diagnoses: u64,
    pub mild_diagnoses: u64,
    pub moderate_diagnoses: u64,
    pub severe_diagnoses: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentStats {
    pub assessment_type: String,
    pub total_assessments: u64,
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub last_assessment_date: String,
}
