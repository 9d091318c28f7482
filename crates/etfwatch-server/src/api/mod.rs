mod report;
mod status;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use etfwatch_core::Environment;
use etfwatch_report::ReportContext;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState,
};

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<ReportContext>,
    pub env: Environment,
    pub report_cron: Option<String>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

/// Routes that trigger outbound work: rate limited, optionally authenticated.
fn trigger_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/etf-report", get(report::etf_report).post(report::etf_report))
        .route("/test-telegram", get(report::test_telegram))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/", get(status::home))
        .route("/health", get(status::health))
        .route("/debug-env", get(status::debug_env));

    Router::new()
        .merge(public_routes)
        .merge(trigger_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(10, Duration::from_secs(60))
}
