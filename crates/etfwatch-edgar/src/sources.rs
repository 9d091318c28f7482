//! Source collection: fetch, parse and classify every configured source.

use etfwatch_core::{FeedSource, Filing, ReportSettings};

use crate::classify::classify;
use crate::client::EdgarClient;
use crate::dedup::dedup_and_sort;
use crate::error::EdgarError;
use crate::feed::parse_feed;
use crate::types::RawEntry;

/// A source that was skipped because its fetch or parse failed.
#[derive(Debug)]
pub struct SourceFailure {
    pub source_name: String,
    pub error: EdgarError,
}

/// Everything one collection pass produced.
#[derive(Debug, Default)]
pub struct CollectionOutcome {
    /// Deduplicated by URL, newest first.
    pub filings: Vec<Filing>,
    pub failed_sources: Vec<SourceFailure>,
    /// Entries parsed successfully but turned away by the classifier.
    pub rejected: usize,
}

/// Collect filings from every source, in order.
///
/// Continues past individual source failures, logging warnings. Returns an
/// empty filing list if every source fails.
pub async fn collect_filings(
    client: &EdgarClient,
    sources: &[FeedSource],
    settings: &ReportSettings,
) -> CollectionOutcome {
    let mut outcome = CollectionOutcome::default();
    let mut filings = Vec::new();

    for source in sources {
        match collect_source(client, source, settings).await {
            Ok((source_filings, rejected)) => {
                tracing::debug!(
                    source = %source.name,
                    count = source_filings.len(),
                    rejected,
                    "collected filings from source"
                );
                outcome.rejected += rejected;
                filings.extend(source_filings);
            }
            Err(e) => {
                tracing::warn!(
                    source = %source.name,
                    url = %source.url,
                    error = %e,
                    "source failed; skipping"
                );
                outcome.failed_sources.push(SourceFailure {
                    source_name: source.name.clone(),
                    error: e,
                });
            }
        }
    }

    outcome.filings = dedup_and_sort(filings);
    tracing::info!(
        sources = sources.len(),
        failed = outcome.failed_sources.len(),
        filings = outcome.filings.len(),
        "collection complete"
    );
    outcome
}

/// Fetch and parse one source, then classify its entries.
///
/// Returns the accepted filings and the number of rejected entries.
///
/// # Errors
///
/// Returns [`EdgarError`] if the fetch fails or the body cannot be parsed.
pub async fn collect_source(
    client: &EdgarClient,
    source: &FeedSource,
    settings: &ReportSettings,
) -> Result<(Vec<Filing>, usize), EdgarError> {
    let response = client.fetch_source(source).await?;
    let entries = parse_feed(&response.body, source.shape, &source.url)?;
    let total = entries.len();
    let filings = classify_entries(&entries, source, settings);
    let rejected = total - filings.len();
    Ok((filings, rejected))
}

/// Classify parsed entries, logging each rejection at debug.
#[must_use]
pub fn classify_entries(
    entries: &[RawEntry],
    source: &FeedSource,
    settings: &ReportSettings,
) -> Vec<Filing> {
    entries
        .iter()
        .filter_map(
            |entry| match classify(entry, source.form_type.as_deref(), settings) {
                Ok(filing) => Some(filing),
                Err(reason) => {
                    tracing::debug!(
                        source = %source.name,
                        title = %entry.title,
                        reason = %reason,
                        "entry rejected"
                    );
                    None
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use etfwatch_core::ContentShape;

    use super::*;

    fn source() -> FeedSource {
        FeedSource {
            name: "edgar-current-n-1a".to_string(),
            url: "https://www.sec.gov/cgi-bin/browse-edgar".to_string(),
            shape: ContentShape::Atom,
            form_type: Some("N-1A".to_string()),
        }
    }

    fn raw(title: &str, link: &str) -> RawEntry {
        RawEntry {
            title: title.to_string(),
            link: link.to_string(),
            summary: None,
            updated: Some("2025-01-13T10:00:00-05:00".to_string()),
            form_type: None,
        }
    }

    #[test]
    fn classify_entries_keeps_only_qualifying() {
        let entries = vec![
            raw("Acme Space ETF", "https://a"),
            raw("Acme Bond Fund", "https://b"),
            raw("Acme Liquidation ETF", "https://c"),
        ];
        let filings = classify_entries(&entries, &source(), &ReportSettings::default());
        assert_eq!(filings.len(), 1);
        assert_eq!(filings[0].name, "Acme Space ETF");
        // Source scoping supplies the form type.
        assert_eq!(filings[0].form_type, "N-1A");
    }
}
