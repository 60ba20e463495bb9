use chrono::{Local, NaiveDateTime};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;

use crate::api::{QueryParams, Resource, SortOrder};
use crate::cli::utils::{output_records, output_success, output_value, parse_filter, read_json_stdin};
use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::format::{age_group, format_currency, format_date, format_date_time, format_phone, parse_api_date};
use crate::models::{Appointment, Assessment, Diagnosis, Invoice, Medication, Patient, Payment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Patients,
    Appointments,
    Diagnoses,
    Medications,
    Assessments,
    Payments,
    Invoices,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ListArgs {
    #[arg(long, help = "Page number (1-based)")]
    pub page: Option<u32>,
    #[arg(long, help = "Page size")]
    pub limit: Option<u32>,
    #[arg(long, help = "Free-text search")]
    pub search: Option<String>,
    #[arg(long, help = "Field to sort by")]
    pub sort_by: Option<String>,
    #[arg(long, help = "Sort direction: asc or desc")]
    pub sort_order: Option<String>,
    #[arg(long = "filter", help = "Field filter as field=value (repeatable)")]
    pub filters: Vec<String>,
}

impl ListArgs {
    pub fn to_params(&self) -> anyhow::Result<QueryParams> {
        let mut params = QueryParams::new();
        if let Some(page) = self.page {
            params = params.page(page);
        }
        if let Some(limit) = self.limit {
            params = params.limit(limit);
        }
        if let Some(search) = &self.search {
            params = params.search(search.clone());
        }
        if let Some(field) = &self.sort_by {
            let order = self.sort_order.as_deref().map(SortOrder::parse).unwrap_or(SortOrder::Asc);
            params = params.sort(field.clone(), order);
        }
        for raw in &self.filters {
            let (field, value) = parse_filter(raw)?;
            params = params.filter(field, value);
        }
        Ok(params)
    }
}

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List records, or fetch one by id")]
    Select {
        #[arg(value_enum, help = "Resource name")]
        resource: ResourceKind,
        #[arg(help = "Record ID to retrieve (optional)")]
        id: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },

    #[command(about = "Create record from JSON on stdin")]
    Create {
        #[arg(value_enum, help = "Resource name")]
        resource: ResourceKind,
    },

    #[command(about = "Update record from JSON on stdin")]
    Update {
        #[arg(value_enum, help = "Resource name")]
        resource: ResourceKind,
        #[arg(help = "Record ID to update")]
        id: String,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(value_enum, help = "Resource name")]
        resource: ResourceKind,
        #[arg(help = "Record ID to delete")]
        id: String,
    },
}

/// One-line text rendering of a record.
pub trait Summary {
    fn summary(&self) -> String;
}

macro_rules! for_resource {
    ($kind:expr, $run:ident ( $($arg:expr),* )) => {
        match $kind {
            ResourceKind::Patients => $run::<Patient>($($arg),*).await,
            ResourceKind::Appointments => $run::<Appointment>($($arg),*).await,
            ResourceKind::Diagnoses => $run::<Diagnosis>($($arg),*).await,
            ResourceKind::Medications => $run::<Medication>($($arg),*).await,
            ResourceKind::Assessments => $run::<Assessment>($($arg),*).await,
            ResourceKind::Payments => $run::<Payment>($($arg),*).await,
            ResourceKind::Invoices => $run::<Invoice>($($arg),*).await,
        }
    };
}

pub async fn handle(cmd: DataCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DataCommands::Select { resource, id, list } => match id {
            Some(id) => for_resource!(resource, select_one(ctx, id, output_format)),
            None => {
                let params = list.to_params()?;
                for_resource!(resource, select_many(ctx, params, output_format))
            }
        },
        DataCommands::Create { resource } => {
            let body = read_json_stdin()?;
            for_resource!(resource, create(ctx, body, output_format))
        }
        DataCommands::Update { resource, id } => {
            let body = read_json_stdin()?;
            for_resource!(resource, update(ctx, id, body, output_format))
        }
        DataCommands::Delete { resource, id } => for_resource!(resource, delete(ctx, id, output_format)),
    }
}

async fn select_many<R: Resource + Summary>(
    ctx: &AppContext,
    params: QueryParams,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let hook = ctx.list::<R>(params);
    hook.refetch().await?;

    let state = hook.state();
    output_records(output_format, R::PLURAL, &state.data, Some(&state.pagination), |r| r.summary())
}

async fn select_one<R: Resource + Summary>(ctx: &AppContext, id: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let hook = ctx.item::<R>(id.clone());
    let record = hook
        .fetch()
        .await?
        .ok_or_else(|| anyhow::anyhow!("No {} with id '{}'", R::SINGULAR, id))?;

    output_value(output_format, R::SINGULAR, &record, |r| r.summary())
}

async fn create<R: Resource + Summary>(
    ctx: &AppContext,
    body: serde_json::Value,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let created = ctx.create::<R>().run(&body).await?;
    let id = created.as_ref().map(|r| r.id().to_string());

    output_success(
        output_format,
        &format!("Created {} {}", R::SINGULAR, id.as_deref().unwrap_or("")).trim_end().to_string(),
        Some(json!({ R::SINGULAR: created })),
    )
}

async fn update<R: Resource + Summary>(
    ctx: &AppContext,
    id: String,
    body: serde_json::Value,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let updated = ctx.update::<R>().run(&id, &body).await?;

    output_success(
        output_format,
        &format!("Updated {} {}", R::SINGULAR, id),
        Some(json!({ R::SINGULAR: updated })),
    )
}

async fn delete<R: Resource + Summary>(ctx: &AppContext, id: String, output_format: OutputFormat) -> anyhow::Result<()> {
    ctx.delete::<R>().run(&id).await?;
    output_success(output_format, &format!("Deleted {} {}", R::SINGULAR, id), None)
}

/// Wire name of a serde enum, e.g. `no_show`.
fn wire<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

fn when(timestamp: &str) -> String {
    let trimmed = timestamp.trim_end_matches('Z');
    let trimmed = trimmed.split('.').next().unwrap_or(trimmed);
    match NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        Ok(at) => format_date_time(at),
        Err(_) => parse_api_date(timestamp).map(format_date).unwrap_or_else(|| timestamp.to_string()),
    }
}

impl Summary for Patient {
    fn summary(&self) -> String {
        let today = Local::now().date_naive();
        let age = self
            .age_on(today)
            .map(|age| format!("{} años, {}", age, age_group(age)))
            .unwrap_or_default();
        let phone = self.phone.as_deref().map(format_phone).unwrap_or_default();
        format!("{}  {}  {}  {}  {}", self.id, self.full_name(), self.gender.label(), age, phone)
            .trim_end()
            .to_string()
    }
}

impl Summary for Appointment {
    fn summary(&self) -> String {
        let who = self
            .patient_name
            .clone()
            .or_else(|| self.patient.as_ref().map(Patient::full_name))
            .unwrap_or_else(|| self.patient_id.clone());
        format!(
            "{}  {}  {}  {} ({} min)  {}",
            self.id,
            when(&self.scheduled_date),
            who,
            self.appointment_type.label(),
            self.duration_minutes,
            wire(&self.status)
        )
    }
}

impl Summary for Diagnosis {
    fn summary(&self) -> String {
        format!(
            "{}  {} {}  {}  {}",
            self.id,
            self.diagnosis_code,
            self.diagnosis_name,
            self.severity.label(),
            wire(&self.status)
        )
    }
}

impl Summary for Medication {
    fn summary(&self) -> String {
        format!(
            "{}  {} {} {}  {}",
            self.id,
            self.medication_name,
            self.dosage,
            self.frequency,
            wire(&self.status)
        )
    }
}

impl Summary for Assessment {
    fn summary(&self) -> String {
        let score = match (self.score, self.max_score) {
            (Some(score), Some(max)) => format!("{}/{}", score, max),
            (Some(score), None) => score.to_string(),
            _ => "-".to_string(),
        };
        format!("{}  {}  {}  {}", self.id, wire(&self.assessment_type).to_uppercase(), score, self.interpretation.as_deref().unwrap_or(""))
            .trim_end()
            .to_string()
    }
}

impl Summary for Payment {
    fn summary(&self) -> String {
        format!(
            "{}  {}  {}  {}",
            self.id,
            format_currency(self.amount, &self.currency),
            self.payment_method.label(),
            wire(&self.status)
        )
    }
}

impl Summary for Invoice {
    fn summary(&self) -> String {
        format!(
            "{}  #{}  {}  {}  due {}",
            self.id,
            self.invoice_number,
            format_currency(self.total_amount, &self.currency),
            wire(&self.status),
            when(&self.due_date)
        )
    }
}
