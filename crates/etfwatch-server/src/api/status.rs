use axum::{extract::State, Json};
use chrono::Utc;
use etfwatch_telegram::CredentialStatus;
use serde::Serialize;

use super::AppState;

const SERVICE_NAME: &str = "etfwatch";

#[derive(Debug, Serialize)]
pub(super) struct HomeResponse {
    status: &'static str,
    service: &'static str,
    time: String,
    env_check: EnvCheck,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct EnvCheck {
    telegram_bot_token: &'static str,
    telegram_chat_id: &'static str,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct HealthData {
    status: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct DebugEnvResponse {
    environment: String,
    #[serde(flatten)]
    credentials: CredentialStatus,
    sources: usize,
    report_cron: Option<String>,
}

fn presence(set: bool) -> &'static str {
    if set {
        "set"
    } else {
        "not set"
    }
}

/// Liveness plus a credential presence check.
pub(super) async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    let credentials = state.ctx.notifier.credential_status();
    let local = Utc::now().with_timezone(&state.ctx.settings.local_timezone_offset);
    Json(HomeResponse {
        status: "healthy",
        service: SERVICE_NAME,
        time: local.to_rfc3339(),
        env_check: EnvCheck {
            telegram_bot_token: presence(credentials.bot_token_set),
            telegram_chat_id: presence(credentials.chat_id_set),
        },
    })
}

pub(super) async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}

/// Masked configuration diagnostics. Never includes the token value.
pub(super) async fn debug_env(State(state): State<AppState>) -> Json<DebugEnvResponse> {
    Json(DebugEnvResponse {
        environment: state.env.to_string(),
        credentials: state.ctx.notifier.credential_status(),
        sources: state.ctx.sources.len(),
        report_cron: state.report_cron.clone(),
    })
}
