//! Recurring sync runs driven by `tokio-cron-scheduler`.

use std::sync::Arc;

use anyhow::Context;
use catsync_core::AppConfig;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::run::{build_reconciler, run_once, run_timeout};

/// Registers the sync job on `cron` and runs until Ctrl-C.
///
/// A tick that fires while the previous run is still going is skipped, so at
/// most one run is ever in flight.
///
/// # Errors
///
/// Fails if the reconciler cannot be built, the cron expression is invalid,
/// or the scheduler cannot start.
pub(crate) async fn run_schedule(config: &AppConfig, cron: &str, dry_run: bool) -> anyhow::Result<()> {
    let reconciler = Arc::new(build_reconciler(config, dry_run)?);
    let in_progress = Arc::new(Mutex::new(()));
    let limit = run_timeout(config);

    let mut scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let reconciler = Arc::clone(&reconciler);
        let in_progress = Arc::clone(&in_progress);

        Box::pin(async move {
            let Ok(_running) = in_progress.try_lock() else {
                tracing::warn!("scheduler: previous sync run still in progress; skipping tick");
                return;
            };

            tracing::info!("scheduler: starting sync run");
            match run_once(&reconciler, limit).await {
                Ok(summary) => tracing::info!(%summary, "scheduler: sync run complete"),
                Err(e) => tracing::error!(error = %e, "scheduler: sync run aborted"),
            }
        })
    })
    .with_context(|| format!("invalid cron expression '{cron}'"))?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(cron, "scheduler: registered sync job; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("scheduler: shutting down");
    scheduler.shutdown().await?;
    Ok(())
}
