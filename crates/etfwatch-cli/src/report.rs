//! Report command handlers for the CLI.
//!
//! Human-readable output goes to stdout; logs go to stderr so `preview`
//! output can be piped.

use chrono::Utc;
use etfwatch_report::{preview_report, run_report_cycle, send_connectivity_test, ReportContext};

/// Run one cycle and print the [`etfwatch_core::ReportResult`] as JSON.
///
/// # Errors
///
/// Returns an error when the cycle did not deliver the report, so the
/// process exits non-zero.
pub(crate) async fn run_report(ctx: &ReportContext) -> anyhow::Result<()> {
    let result = run_report_cycle(ctx).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_success() {
        anyhow::bail!(
            "report cycle failed: {}",
            result.error.as_deref().unwrap_or(&result.message)
        );
    }
    Ok(())
}

/// Collect and format without sending.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub(crate) async fn run_preview(ctx: &ReportContext, json: bool) -> anyhow::Result<()> {
    let preview = preview_report(ctx, Utc::now()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&preview.filings)?);
    } else {
        println!("{}", preview.text);
    }

    if preview.failed_sources > 0 {
        eprintln!(
            "warning: {} of {} source(s) failed; see logs",
            preview.failed_sources,
            ctx.sources.len()
        );
    }
    Ok(())
}

/// Send the Telegram connectivity test message.
///
/// # Errors
///
/// Returns the notifier error when delivery fails.
pub(crate) async fn run_test_telegram(ctx: &ReportContext) -> anyhow::Result<()> {
    send_connectivity_test(ctx, Utc::now()).await?;
    println!("telegram connectivity test delivered");
    Ok(())
}
