use clap::{Subcommand, ValueEnum};

use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::models::{AiRequest, AiRequestType};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AiKind {
    Diagnosis,
    Treatment,
    Assessment,
    General,
}

impl From<AiKind> for AiRequestType {
    fn from(kind: AiKind) -> Self {
        match kind {
            AiKind::Diagnosis => AiRequestType::Diagnosis,
            AiKind::Treatment => AiRequestType::Treatment,
            AiKind::Assessment => AiRequestType::Assessment,
            AiKind::General => AiRequestType::General,
        }
    }
}

#[derive(Subcommand)]
pub enum AiCommands {
    #[command(about = "Ask the clinical assistant")]
    Chat {
        #[arg(help = "Question or instruction")]
        prompt: String,
        #[arg(long, help = "Extra context, e.g. a case summary")]
        context: Option<String>,
        #[arg(long = "type", value_enum, default_value = "general", help = "Kind of request")]
        kind: AiKind,
    },
}

pub async fn handle(cmd: AiCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AiCommands::Chat { prompt, context, kind } => {
            let request = AiRequest {
                prompt,
                context,
                kind: kind.into(),
            };

            let reply = ctx
                .api
                .chat_with_ai(&request)
                .await?
                .into_result("Error contacting the assistant")?
                .ok_or_else(|| anyhow::anyhow!("The assistant returned no answer"))?;

            output_value(output_format, "reply", &reply, |r| {
                let mut out = r.response.clone();
                for suggestion in &r.suggestions {
                    out.push_str(&format!("\n  - {}", suggestion));
                }
                for warning in &r.warnings {
                    out.push_str(&format!("\n  ! {}", warning));
                }
                out
            })
        }
    }
}
