use clap::Subcommand;

use super::data::{ListArgs, Summary};
use crate::cli::utils::{output_records, output_value};
use crate::cli::OutputFormat;
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum ClinicalCommands {
    #[command(about = "Diagnoses recorded for a patient")]
    Diagnoses {
        #[arg(help = "Patient ID")]
        patient_id: String,
    },

    #[command(about = "Diagnosis counters across the practice")]
    DiagnosisStats,

    #[command(about = "Assessments recorded for a patient")]
    Assessments {
        #[arg(help = "Patient ID")]
        patient_id: String,
        #[command(flatten)]
        list: ListArgs,
    },

    #[command(about = "Available assessment templates")]
    Templates,

    #[command(about = "Score an assessment on the server")]
    Calculate {
        #[arg(help = "Assessment ID")]
        assessment_id: String,
    },

    #[command(about = "Assessment score statistics for a patient")]
    AssessmentStats {
        #[arg(help = "Patient ID")]
        patient_id: String,
    },
}

pub async fn handle(cmd: ClinicalCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let api = &ctx.api;

    match cmd {
        ClinicalCommands::Diagnoses { patient_id } => {
            let page = api.patient_diagnoses(&patient_id).await?.into_page("Error loading diagnoses")?;
            output_records(output_format, "diagnoses", &page.items, None, |d| d.summary())
        }
        ClinicalCommands::DiagnosisStats => {
            let stats = api
                .diagnosis_stats()
                .await?
                .into_result("Error loading diagnosis stats")?
                .unwrap_or_default();

            output_value(output_format, "stats", &stats, |s| {
                format!(
                    "total {}  active {}  resolved {}  chronic {}\nmild {}  moderate {}  severe {}",
                    s.total_diagnoses,
                    s.active_diagnoses,
                    s.resolved_diagnoses,
                    s.chronic_diagnoses,
                    s.mild_diagnoses,
                    s.moderate_diagnoses,
                    s.severe_diagnoses
                )
            })
        }
        ClinicalCommands::Assessments { patient_id, list } => {
            let params = list.to_params()?;
            let page = api
                .patient_assessments(&patient_id, &params)
                .await?
                .into_page("Error loading assessments")?;
            output_records(output_format, "assessments", &page.items, Some(&page.pagination), |a| a.summary())
        }
        ClinicalCommands::Templates => {
            let templates = api
                .assessment_templates()
                .await?
                .into_result("Error loading assessment templates")?
                .unwrap_or_default();
            output_value(output_format, "templates", &templates, |t| {
                serde_json::to_string_pretty(t).unwrap_or_default()
            })
        }
        ClinicalCommands::Calculate { assessment_id } => {
            let result = api
                .calculate_assessment(&assessment_id)
                .await?
                .into_result("Error calculating assessment")?
                .unwrap_or_default();
            output_value(output_format, "result", &result, |r| {
                serde_json::to_string_pretty(r).unwrap_or_default()
            })
        }
        ClinicalCommands::AssessmentStats { patient_id } => {
            let stats = api
                .assessment_stats(&patient_id)
                .await?
                .into_result("Error loading assessment stats")?
                .unwrap_or_default();

            output_records(output_format, "stats", &stats, None, |s| {
                format!(
                    "{}  n={}  avg {:.1}  max {}  min {}  last {}",
                    s.assessment_type.to_uppercase(),
                    s.total_assessments,
                    s.average_score,
                    s.highest_score,
                    s.lowest_score,
                    s.last_assessment_date
                )
            })
        }
    }
}
