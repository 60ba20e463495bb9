pub mod commands;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::navigation::LogNavigator;

#[derive(Parser)]
#[command(name = "psych")]
#[command(about = "Psych CLI - Command-line client for the practice management API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign out and inspect the stored session")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "CRUD operations on patients, appointments, billing and clinical records")]
    Data {
        #[command(subcommand)]
        cmd: commands::data::DataCommands,
    },

    #[command(about = "Today's and upcoming appointments")]
    Appointments {
        #[command(subcommand)]
        cmd: commands::appointments::AppointmentCommands,
    },

    #[command(about = "Diagnosis and assessment endpoints")]
    Clinical {
        #[command(subcommand)]
        cmd: commands::clinical::ClinicalCommands,
    },

    #[command(about = "Clinical assistant")]
    Ai {
        #[command(subcommand)]
        cmd: commands::ai::AiCommands,
    },

    #[command(about = "Dashboard counters and today's agenda")]
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = AppContext::init(config, Arc::new(LogNavigator))?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx, output_format).await,
        Commands::Data { cmd } => commands::data::handle(cmd, &ctx, output_format).await,
        Commands::Appointments { cmd } => commands::appointments::handle(cmd, &ctx, output_format).await,
        Commands::Clinical { cmd } => commands::clinical::handle(cmd, &ctx, output_format).await,
        Commands::Ai { cmd } => commands::ai::handle(cmd, &ctx, output_format).await,
        Commands::Dashboard => commands::dashboard::handle(&ctx, output_format).await,
    }
}
