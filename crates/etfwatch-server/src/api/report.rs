use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use serde::Serialize;

use crate::middleware::RequestId;

use super::AppState;

#[derive(Debug, Serialize)]
pub(super) struct ReportResponse {
    status: String,
    message: String,
    filings_count: usize,
    failed_sources: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Cycle time in the local display timezone.
    timestamp: String,
    request_id: String,
}

#[derive(Debug, Serialize)]
pub(super) struct TelegramTestResponse {
    status: &'static str,
    message: String,
    request_id: String,
}

/// Runs one report cycle. 200 when the digest was delivered, 502 otherwise.
pub(super) async fn etf_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> (StatusCode, Json<ReportResponse>) {
    tracing::info!(request_id = %req_id.0, "manual report trigger");
    let result = etfwatch_report::run_report_cycle(&state.ctx).await;

    let status = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    let local_offset = state.ctx.settings.local_timezone_offset;

    (
        status,
        Json(ReportResponse {
            status: result.status.to_string(),
            message: result.message,
            filings_count: result.filing_count,
            failed_sources: result.failed_sources,
            error: result.error,
            timestamp: result.timestamp.with_timezone(&local_offset).to_rfc3339(),
            request_id: req_id.0,
        }),
    )
}

/// Sends the connectivity test message.
pub(super) async fn test_telegram(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> (StatusCode, Json<TelegramTestResponse>) {
    match etfwatch_report::send_connectivity_test(&state.ctx, Utc::now()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(TelegramTestResponse {
                status: "success",
                message: "telegram message delivered".to_string(),
                request_id: req_id.0,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "telegram connectivity test failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(TelegramTestResponse {
                    status: "error",
                    message: e.to_string(),
                    request_id: req_id.0,
                }),
            )
        }
    }
}
