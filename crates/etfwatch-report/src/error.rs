use thiserror::Error;

/// Errors building a [`crate::ReportContext`]. A running cycle never fails;
/// it reports problems through [`etfwatch_core::ReportResult`].
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Config(#[from] etfwatch_core::ConfigError),

    #[error("failed to build EDGAR client: {0}")]
    Client(#[from] etfwatch_edgar::FetchError),

    #[error("failed to build notifier: {0}")]
    Notifier(#[from] etfwatch_telegram::NotifyError),
}
