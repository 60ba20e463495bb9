use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::patient::Patient;
use crate::api::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentType {
    Phq9,
    Gad7,
    Moca,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub doctor_id: String,
    pub assessment_type: AssessmentType,
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    pub interpretation: Option<String>,
    #[serde(default)]
    pub responses: BTreeMap<String, Value>,
    pub notes: Option<String>,
    #[serde(default)]
    pub completed_at: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub patient: Option<Patient>,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
}

impl Resource for Assessment {
    const PATH: &'static str = "/assessments";
    const SINGULAR: &'static str = "assessment";
    const PLURAL: &'static str = "assessments";
    const LABEL: &'static str = "evaluación";
    const LABEL_PLURAL: &'static str = "evaluaciones";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_type: Option<AssessmentType>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
}
