use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use etfwatch_core::ReportSettings;
use regex::Regex;

use super::qualify::strip_form_prefix;
use crate::text::{collapse_whitespace, decode_entities, to_plain_text, truncate_chars};
use crate::types::RawEntry;

static SERIES_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)series\s+name\s*[:\-]\s*([^<\r\n;|]+?)\s*(?:$|[<\r\n;|]|\b(?:series|class)\s+(?:id|name)\b)",
    )
    .expect("valid regex")
});
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:b|strong)\b[^>]*>(.*?)</(?:b|strong)\s*>").expect("valid regex")
});
/// Up to eight capitalized words (or camel-case brands like `iShares`)
/// ending in a product-type keyword. Lowercase prose, commas and dashes
/// break the run.
static PRODUCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b((?:(?:[A-Z0-9]|[a-z][A-Z])[\w&.'’]*\s+|&\s+){1,8}(?:ETFs?|Fund|Trust))\b",
    )
    .expect("valid regex")
});
static BOILERPLATE_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*(?:\d{4,}|cik\b[^)]*|filer|subject|filed\s+by|reporting)\s*\)")
        .expect("valid regex")
});
static SEGMENT_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+-\s+|\s*[–—]\s*").expect("valid regex"));

/// Name patterns, most specific first.
static NAME_PATTERNS: [(&LazyLock<Regex>, CandidateKind); 3] = [
    (&SERIES_NAME_RE, CandidateKind::Labeled),
    (&BOLD_RE, CandidateKind::Emphasis),
    (&PRODUCT_RE, CandidateKind::ProductRun),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateKind {
    Labeled,
    /// Bold spans double as field labels (`<b>Filed:</b>`); those are skipped.
    Emphasis,
    /// Matched against plain text rather than markup.
    ProductRun,
}

/// Extract the display name, trying the summary before the title and the
/// title's leading segment last.
pub(crate) fn extract_name(entry: &RawEntry, settings: &ReportSettings) -> Option<String> {
    let summary = entry.summary.as_deref().unwrap_or_default();
    [summary, entry.title.as_str()]
        .into_iter()
        .filter(|text| !text.trim().is_empty())
        .find_map(|text| name_from_patterns(text, settings))
        .or_else(|| {
            leading_segment(strip_form_prefix(&entry.title))
                .and_then(|segment| clean_name(segment, settings))
        })
}

fn name_from_patterns(text: &str, settings: &ReportSettings) -> Option<String> {
    let decoded = decode_entities(text);
    let plain = to_plain_text(text);

    NAME_PATTERNS.iter().find_map(|(re, kind)| {
        let haystack = match kind {
            CandidateKind::ProductRun => plain.as_str(),
            CandidateKind::Labeled | CandidateKind::Emphasis => decoded.as_str(),
        };
        re.captures_iter(haystack)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str())
            .filter(|candidate| {
                *kind != CandidateKind::Emphasis || !to_plain_text(candidate).ends_with(':')
            })
            .find_map(|candidate| clean_name(candidate, settings))
    })
}

/// Normalize a candidate and apply the length policy.
///
/// Returns `None` when the cleaned text is shorter than `min_name_length` or
/// has no letters; longer text is cut to `max_name_length` characters.
pub(crate) fn clean_name(raw: &str, settings: &ReportSettings) -> Option<String> {
    clean_text(raw, settings.min_name_length, settings.max_name_length)
}

fn clean_text(raw: &str, min_chars: usize, max_chars: usize) -> Option<String> {
    let plain = to_plain_text(raw);
    let without_codes = BOILERPLATE_PAREN_RE.replace_all(&plain, " ");
    let collapsed = collapse_whitespace(&without_codes);
    let trimmed = trim_separators(&collapsed);

    if !trimmed.chars().any(char::is_alphabetic) || trimmed.chars().count() < min_chars {
        return None;
    }
    let truncated = trim_separators(truncate_chars(trimmed, max_chars));
    if truncated.chars().count() < min_chars {
        return None;
    }
    Some(truncated.to_string())
}

fn trim_separators(s: &str) -> &str {
    s.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | ',' | ';' | '|' | '·' | '/')
    })
}

fn leading_segment(title: &str) -> Option<&str> {
    SEGMENT_SPLIT_RE
        .split(title)
        .map(str::trim)
        .find(|segment| !segment.is_empty())
}

/// The filer name: the title's leading segment, when the title has more than
/// one segment and that segment is neither a form code nor a phrase
/// containing the product name.
pub(crate) fn extract_company(title: &str, name: &str, form_type: &str) -> Option<String> {
    let body = strip_form_prefix(title);
    let mut segments = SEGMENT_SPLIT_RE
        .split(body)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let first = segments.next()?;
    segments.next()?;

    let company = clean_text(first, 2, 100)?;
    let lower = company.to_lowercase();
    let is_form_code = lower == form_type.to_lowercase()
        || lower == format!("form {}", form_type.to_lowercase());
    if is_form_code || lower.contains(&name.to_lowercase()) {
        return None;
    }
    Some(company)
}

/// Parse a feed timestamp and return its date in the source's timezone.
///
/// Accepts RFC 3339, RFC 2822, bare `YYYY-MM-DD`, and offset-less
/// date-times (taken as already in source time).
#[must_use]
pub fn parse_filing_date(raw: &str, source_offset: FixedOffset) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&source_offset).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&source_offset).date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}
