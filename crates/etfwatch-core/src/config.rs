use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Accepted range for the per-call HTTP timeout.
const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 10..=20;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values are treated as unset so an empty `.env` line does not
    // masquerade as a credential.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("ETFWATCH_ENV", "development"))?;

    // Hosting platforms commonly inject PORT; an explicit bind address wins.
    let default_bind = match lookup("PORT") {
        Ok(port) => {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("PORT", e.to_string()))?;
            format!("0.0.0.0:{port}")
        }
        Err(_) => "0.0.0.0:8080".to_string(),
    };
    let bind_addr = or_default("ETFWATCH_BIND_ADDR", &default_bind)
        .parse::<SocketAddr>()
        .map_err(|e| invalid("ETFWATCH_BIND_ADDR", e.to_string()))?;

    let log_level = or_default("ETFWATCH_LOG_LEVEL", "info");
    let report_config_path = PathBuf::from(or_default(
        "ETFWATCH_CONFIG_PATH",
        "./config/etfwatch.yaml",
    ));

    let telegram_bot_token = optional("TELEGRAM_BOT_TOKEN");
    let telegram_chat_id = optional("TELEGRAM_CHAT_ID");
    let telegram_api_base = or_default("ETFWATCH_TELEGRAM_API_BASE", "https://api.telegram.org");

    let user_agent = or_default("ETFWATCH_USER_AGENT", "etfwatch/0.1 (ops@example.com)");
    if user_agent.trim().is_empty() {
        return Err(invalid(
            "ETFWATCH_USER_AGENT",
            "must identify the operator".to_string(),
        ));
    }

    let request_timeout_secs = or_default("ETFWATCH_REQUEST_TIMEOUT_SECS", "15")
        .parse::<u64>()
        .map_err(|e| invalid("ETFWATCH_REQUEST_TIMEOUT_SECS", e.to_string()))?;
    if !TIMEOUT_RANGE_SECS.contains(&request_timeout_secs) {
        return Err(invalid(
            "ETFWATCH_REQUEST_TIMEOUT_SECS",
            format!(
                "{request_timeout_secs} is outside {}..={}",
                TIMEOUT_RANGE_SECS.start(),
                TIMEOUT_RANGE_SECS.end()
            ),
        ));
    }

    let report_cron = optional("ETFWATCH_REPORT_CRON");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        report_config_path,
        telegram_bot_token,
        telegram_chat_id,
        telegram_api_base,
        user_agent,
        request_timeout_secs,
        report_cron,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ETFWATCH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
