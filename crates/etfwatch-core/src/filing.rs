use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One qualifying ETF registration filing collected during a report cycle.
///
/// Filings are rebuilt from source data on every cycle and dropped once the
/// report has been formatted; nothing is persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    /// Display name of the fund or product, cleaned of markup.
    pub name: String,
    /// Form-type code, e.g. `N-1A`.
    pub form_type: String,
    /// Publish/update date in the source's home timezone.
    pub filing_date: NaiveDate,
    /// Canonical link to the filing; unique within one cycle.
    pub url: String,
    /// Filer name when it can be told apart from the product name.
    pub company: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Error,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Success => write!(f, "success"),
            ReportStatus::Error => write!(f, "error"),
        }
    }
}

/// Outcome of one report cycle.
///
/// Collection and notification are reported independently: `filing_count`
/// always reflects what was collected, even when the send failed.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResult {
    pub status: ReportStatus,
    pub filing_count: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of sources whose fetch or parse failed and were skipped.
    pub failed_sources: usize,
    pub timestamp: DateTime<Utc>,
}

impl ReportResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ReportStatus::Success
    }
}
