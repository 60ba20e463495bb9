use std::sync::Arc;

use clap::Subcommand;

use super::data::Summary;
use crate::cli::utils::output_records;
use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::hooks::{today_appointments, upcoming_appointments};

#[derive(Subcommand)]
pub enum AppointmentCommands {
    #[command(about = "Appointments scheduled for today")]
    Today,

    #[command(about = "Scheduled appointments from today on, soonest first")]
    Upcoming {
        #[arg(long, help = "Maximum number of appointments (default 10)")]
        limit: Option<u32>,
    },
}

pub async fn handle(cmd: AppointmentCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let hook = match cmd {
        AppointmentCommands::Today => today_appointments(Arc::clone(&ctx.api)),
        AppointmentCommands::Upcoming { limit } => upcoming_appointments(Arc::clone(&ctx.api), limit),
    };

    hook.refetch().await?;
    let state = hook.state();
    output_records(output_format, "appointments", &state.data, None, |a| a.summary())
}
