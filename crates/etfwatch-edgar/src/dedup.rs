//! Cycle-local deduplication and ordering of collected filings.

use std::collections::HashSet;

use etfwatch_core::Filing;

/// Drop filings whose URL was already seen; the first occurrence wins.
#[must_use]
pub fn dedup_by_url(mut filings: Vec<Filing>) -> Vec<Filing> {
    let mut seen = HashSet::new();
    filings.retain(|f| seen.insert(f.url.clone()));
    filings
}

/// Newest filing date first. Stable, so equal dates keep collection order.
pub fn sort_by_date_desc(filings: &mut [Filing]) {
    filings.sort_by(|a, b| b.filing_date.cmp(&a.filing_date));
}

/// [`dedup_by_url`] followed by [`sort_by_date_desc`]. Idempotent.
#[must_use]
pub fn dedup_and_sort(filings: Vec<Filing>) -> Vec<Filing> {
    let mut filings = dedup_by_url(filings);
    sort_by_date_desc(&mut filings);
    filings
}
