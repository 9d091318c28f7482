//! Report cycle orchestration.

use chrono::{DateTime, Utc};
use etfwatch_core::{
    load_report_file_or_default, AppConfig, FeedSource, Filing, ReportResult, ReportSettings,
    ReportStatus,
};
use etfwatch_edgar::{collect_filings, EdgarClient};
use etfwatch_telegram::{NotifyError, TelegramNotifier};
use serde::Serialize;

use crate::error::ReportError;
use crate::format::{format_connectivity_test, format_report};

/// Everything a cycle needs. Immutable once built, so concurrent cycles can
/// share one instance behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub client: EdgarClient,
    pub notifier: TelegramNotifier,
    pub settings: ReportSettings,
    pub sources: Vec<FeedSource>,
}

impl ReportContext {
    /// Build the context from process configuration and the report file it
    /// points at (defaults when the file does not exist).
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if the report file is invalid or an HTTP
    /// client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReportError> {
        let report = load_report_file_or_default(&config.report_config_path)?;
        tracing::info!(
            path = %config.report_config_path.display(),
            sources = report.sources.len(),
            "loaded report configuration"
        );
        Ok(Self {
            client: EdgarClient::new(&config.user_agent, config.request_timeout_secs)?,
            notifier: TelegramNotifier::from_config(config)?,
            settings: report.settings,
            sources: report.sources,
        })
    }
}

/// A formatted report that was not sent.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPreview {
    pub text: String,
    pub filings: Vec<Filing>,
    pub failed_sources: usize,
}

/// Run one report cycle stamped with the current time.
pub async fn run_report_cycle(ctx: &ReportContext) -> ReportResult {
    run_report_cycle_at(ctx, Utc::now()).await
}

/// Run one report cycle as of `now`.
///
/// Sources are fetched in order; a failing source is logged and counted in
/// `failed_sources`. The digest is sent even when it is empty. Notification
/// failure yields [`ReportStatus::Error`] while `filing_count` still reports
/// what was collected.
pub async fn run_report_cycle_at(ctx: &ReportContext, now: DateTime<Utc>) -> ReportResult {
    let outcome = collect_filings(&ctx.client, &ctx.sources, &ctx.settings).await;
    let filing_count = outcome.filings.len();
    let failed_sources = outcome.failed_sources.len();
    let text = format_report(&outcome.filings, now, &ctx.settings);

    match ctx.notifier.send(&text).await {
        Ok(()) => {
            tracing::info!(filing_count, failed_sources, "report sent");
            ReportResult {
                status: ReportStatus::Success,
                filing_count,
                message: format!("report sent with {filing_count} filing(s)"),
                error: None,
                failed_sources,
                timestamp: now,
            }
        }
        Err(e) => {
            tracing::error!(filing_count, error = %e, "report delivery failed");
            ReportResult {
                status: ReportStatus::Error,
                filing_count,
                message: "report delivery failed".to_string(),
                error: Some(e.to_string()),
                failed_sources,
                timestamp: now,
            }
        }
    }
}

/// Collect and format without sending.
pub async fn preview_report(ctx: &ReportContext, now: DateTime<Utc>) -> ReportPreview {
    let outcome = collect_filings(&ctx.client, &ctx.sources, &ctx.settings).await;
    ReportPreview {
        text: format_report(&outcome.filings, now, &ctx.settings),
        failed_sources: outcome.failed_sources.len(),
        filings: outcome.filings,
    }
}

/// Send the connectivity test message.
///
/// # Errors
///
/// Returns the [`NotifyError`] from the send attempt.
pub async fn send_connectivity_test(
    ctx: &ReportContext,
    now: DateTime<Utc>,
) -> Result<(), NotifyError> {
    let text = format_connectivity_test(
        now,
        ctx.settings.local_timezone_offset,
        &ctx.notifier.credential_status(),
    );
    ctx.notifier.send(&text).await
}
