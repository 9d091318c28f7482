use std::sync::LazyLock;

use etfwatch_core::ReportSettings;
use regex::Regex;

use super::Rejection;
use crate::text::to_plain_text;
use crate::types::RawEntry;

/// `Form N-1A`, `form 485APOS`, `Form S-1/A` anywhere in the title.
static FORM_IN_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bform\s+([A-Z0-9][A-Z0-9-]*(?:/A)?)\b").expect("valid regex")
});

/// Leading `N-1A - ` style prefix, as used by EDGAR's current-filings feed.
static FORM_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9-]*(?:/A)?)\s+[-–—]\s+").expect("valid regex")
});

/// Resolve the form type for an entry.
///
/// Order: the entry's own form type, `Form <code>` in the title, a leading
/// `<code> - ` title prefix, then the source's form type. Codes are
/// upper-cased; title-derived codes must contain a digit or a hyphen so
/// ordinary words are never mistaken for one.
#[must_use]
pub fn resolve_form_type(entry: &RawEntry, source_form_type: Option<&str>) -> Option<String> {
    entry
        .form_type
        .as_deref()
        .and_then(normalize_code)
        .or_else(|| form_from_title(&entry.title))
        .or_else(|| form_prefix(&entry.title).map(str::to_uppercase))
        .or_else(|| source_form_type.and_then(normalize_code))
}

/// Apply the form-type and keyword gates, returning the resolved form type.
pub(crate) fn qualify(
    entry: &RawEntry,
    source_form_type: Option<&str>,
    settings: &ReportSettings,
) -> Result<String, Rejection> {
    let form_type = resolve_form_type(entry, source_form_type);

    if let Some(form) = form_type.as_deref() {
        if settings.is_excluded_form_type(form) {
            return Err(Rejection::DeniedFormType(form.to_string()));
        }
        if let Some(base) = form.strip_suffix("/A") {
            if settings.rejects_amendment_suffix(base) {
                return Err(Rejection::AmendmentSuffix(form.to_string()));
            }
        }
    }
    if let Some(amended) = amendment_in_title(&entry.title, settings) {
        return Err(Rejection::AmendmentSuffix(amended));
    }

    if settings.require_allowed_form_type
        && !form_type
            .as_deref()
            .is_some_and(|f| settings.is_allowed_form_type(f))
    {
        return Err(Rejection::FormTypeNotAllowed(form_type));
    }

    let text = to_plain_text(&entry.combined_text()).to_lowercase();
    if !settings
        .etf_keywords
        .iter()
        .any(|k| contains_keyword(&text, &k.to_lowercase()))
    {
        return Err(Rejection::NotEtf);
    }
    if let Some(keyword) = settings
        .exclusion_keywords
        .iter()
        .find(|k| contains_keyword(&text, &k.to_lowercase()))
    {
        return Err(Rejection::ExcludedKeyword(keyword.clone()));
    }

    form_type.ok_or(Rejection::NoFormType)
}

/// The title with a leading form-type prefix removed.
pub(crate) fn strip_form_prefix(title: &str) -> &str {
    match FORM_PREFIX_RE.captures(title) {
        Some(cap) if looks_like_code(&cap[1]) => {
            let end = cap.get(0).map_or(0, |m| m.end());
            &title[end..]
        }
        _ => title,
    }
}

/// Whole-word keyword match on already lower-cased text.
///
/// A trailing plural `s` is tolerated so `etf` also matches `etfs`.
pub(crate) fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return false;
    }
    haystack.match_indices(keyword).any(|(start, matched)| {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let rest = &haystack[start + matched.len()..];
        let rest = rest.strip_prefix('s').unwrap_or(rest);
        let after_ok = rest.chars().next().map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

fn form_from_title(title: &str) -> Option<String> {
    FORM_IN_TITLE_RE
        .captures_iter(title)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .find(|code| looks_like_code(code))
        .map(str::to_uppercase)
}

fn form_prefix(title: &str) -> Option<&str> {
    FORM_PREFIX_RE
        .captures(title)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .filter(|code| looks_like_code(code))
}

fn amendment_in_title(title: &str, settings: &ReportSettings) -> Option<String> {
    let upper = title.to_uppercase();
    settings
        .amendment_suffix_form_types
        .iter()
        .map(|base| format!("{}/A", base.trim().to_uppercase()))
        .find(|amended| contains_keyword(&upper, amended))
}

fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim();
    (!code.is_empty()).then(|| code.to_uppercase())
}

fn looks_like_code(code: &str) -> bool {
    code.chars().any(|c| c.is_ascii_digit() || c == '-')
}
