use std::sync::Arc;

use serde_json::json;

use super::data::Summary;
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::hooks::today_appointments;

pub async fn handle(ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    if !ctx.session.require_auth() {
        return Err(anyhow::anyhow!("Not authenticated, run 'psych auth login' first"));
    }

    let agenda = today_appointments(Arc::clone(&ctx.api));
    let (stats, today) = futures::join!(ctx.api.dashboard_stats(), agenda.refetch());

    let stats = stats?.into_result("Error loading dashboard")?.unwrap_or_default();
    let today = today?;

    let greeting = ctx
        .session
        .user()
        .map(|u| if u.name.is_empty() { u.email } else { u.name })
        .unwrap_or_default();

    output_value(output_format, "dashboard", &json!({ "stats": stats, "today": today }), |_| {
        let mut out = format!(
            "Hola, {}\npatients {}  appointments {} ({} upcoming, {} completed)\nactive diagnoses {}  pending payments {}",
            greeting,
            stats.total_patients,
            stats.total_appointments,
            stats.upcoming_appointments,
            stats.completed_appointments,
            stats.active_diagnoses,
            stats.pending_payments
        );
        out.push_str(&format!("\n\nToday ({}):", today.len()));
        for appointment in &today {
            out.push_str(&format!("\n  {}", appointment.summary()));
        }
        out
    })
}
