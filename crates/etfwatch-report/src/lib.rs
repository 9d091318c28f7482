//! Report cycle for etfwatch: collect filings, format the digest, notify.

pub mod error;
pub mod format;
pub mod pipeline;

pub use error::ReportError;
pub use format::{format_connectivity_test, format_report, NO_FILINGS_TEXT};
pub use pipeline::{
    preview_report, run_report_cycle, run_report_cycle_at, send_connectivity_test,
    ReportContext, ReportPreview,
};
