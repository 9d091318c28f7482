//! Shared types and configuration for etfwatch.
//!
//! Holds the [`Filing`] data model, the [`ReportSettings`] object that drives
//! classification and formatting, and the process-level [`AppConfig`] loaded
//! from environment variables.

pub mod app_config;
pub mod config;
pub mod filing;
pub mod settings;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filing::{Filing, ReportResult, ReportStatus};
pub use settings::{
    load_report_file, load_report_file_or_default, ContentShape, FeedSource, ReportFile,
    ReportSettings,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read report config {path}: {source}")]
    ReportFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse report config: {0}")]
    ReportFileParse(#[from] serde_yaml::Error),

    #[error("report config validation failed: {0}")]
    Validation(String),
}
