//! Background job scheduler.
//!
//! Registers the recurring report cycle when `ETFWATCH_REPORT_CRON` is set.
//! Without a schedule the scheduler still starts but has no jobs, and
//! reports are only sent through the trigger routes.

use std::sync::Arc;

use etfwatch_report::ReportContext;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    ctx: Arc<ReportContext>,
    report_cron: Option<&str>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    match report_cron {
        Some(cron) => register_report_job(&scheduler, ctx, cron).await?,
        None => tracing::info!("scheduler: no report cron configured"),
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the report cycle on `cron` (six-field, seconds first, UTC).
async fn register_report_job(
    scheduler: &JobScheduler,
    ctx: Arc<ReportContext>,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let ctx = Arc::clone(&ctx);

        Box::pin(async move {
            tracing::info!("scheduler: starting report cycle");
            let result = etfwatch_report::run_report_cycle(&ctx).await;
            if result.is_success() {
                tracing::info!(
                    filing_count = result.filing_count,
                    failed_sources = result.failed_sources,
                    "scheduler: report cycle complete"
                );
            } else {
                tracing::error!(
                    filing_count = result.filing_count,
                    error = result.error.as_deref().unwrap_or("unknown"),
                    "scheduler: report cycle failed"
                );
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: registered report job");
    Ok(())
}

#[cfg(test)]
mod tests {
    use etfwatch_core::ReportSettings;
    use etfwatch_edgar::EdgarClient;
    use etfwatch_telegram::TelegramNotifier;

    use super::*;

    fn ctx() -> Arc<ReportContext> {
        Arc::new(ReportContext {
            client: EdgarClient::new("etfwatch-test/0.1 (ops@example.com)", 15).expect("client"),
            notifier: TelegramNotifier::new("http://127.0.0.1:9", None, None, 15)
                .expect("notifier"),
            settings: ReportSettings::default(),
            sources: Vec::new(),
        })
    }

    #[tokio::test]
    async fn invalid_cron_is_rejected() {
        let scheduler = JobScheduler::new().await.expect("scheduler");
        let result = register_report_job(&scheduler, ctx(), "every morning").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn valid_cron_registers() {
        let scheduler = JobScheduler::new().await.expect("scheduler");
        register_report_job(&scheduler, ctx(), "0 0 23 * * *")
            .await
            .expect("daily cron should register");
    }
}
