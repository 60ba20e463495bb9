use clap::Parser;
use psych_client::cli::utils::report_failure;
use psych_client::cli::{Cli, OutputFormat};
use psych_client::config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::config();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if psych_client::is_development!() {
        tracing::debug!("development config: {:?}", config);
    }

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = psych_client::cli::run(cli, config).await {
        if matches!(std::env::var("CLI_VERBOSE").as_deref(), Ok("true") | Ok("1")) {
            tracing::error!("{e:?}");
        }
        report_failure(output_format, &e)?;
        std::process::exit(1);
    }

    Ok(())
}
