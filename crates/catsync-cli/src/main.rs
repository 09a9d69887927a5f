mod run;
mod schedule;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catsync")]
#[command(about = "Sync the distributor catalog into the storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one reconciliation and print its summary
    Sync {
        /// Log every decision without writing to the storefront
        #[arg(long)]
        dry_run: bool,
    },
    /// Run reconciliations on a cron schedule until Ctrl-C
    Schedule {
        /// Six-field cron expression (sec min hour day month weekday);
        /// defaults to `CATSYNC_SCHEDULE`
        #[arg(long)]
        cron: Option<String>,
        /// Log every decision without writing to the storefront
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = catsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Sync { dry_run } => {
            let reconciler = run::build_reconciler(&config, dry_run)?;
            let summary = run::run_once(&reconciler, run::run_timeout(&config)).await?;
            println!("{summary}");
        }
        Commands::Schedule { cron, dry_run } => {
            let cron = cron.unwrap_or_else(|| config.schedule.clone());
            schedule::run_schedule(&config, &cron, dry_run).await?;
        }
    }

    Ok(())
}
