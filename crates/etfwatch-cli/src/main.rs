mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use etfwatch_report::ReportContext;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "etfwatch-cli")]
#[command(about = "etfwatch command line interface")]
struct Cli {
    /// Report config file (overrides ETFWATCH_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one report cycle and send it to Telegram
    Report,
    /// Collect and print the report without sending it
    Preview {
        /// Print collected filings as JSON instead of the message text
        #[arg(long)]
        json: bool,
    },
    /// Send a Telegram connectivity test message
    TestTelegram,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = etfwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = cli.config {
        config.report_config_path = path;
    }
    let ctx = ReportContext::from_config(&config)?;
    tracing::debug!(
        sources = ctx.sources.len(),
        config = %config.report_config_path.display(),
        "report context loaded"
    );

    match cli.command {
        Commands::Report => report::run_report(&ctx).await,
        Commands::Preview { json } => report::run_preview(&ctx, json).await,
        Commands::TestTelegram => report::run_test_telegram(&ctx).await,
    }
}
