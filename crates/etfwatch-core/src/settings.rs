//! Report settings and feed sources, loaded from a YAML file.
//!
//! Every per-deployment knob that used to be a code fork (form-type lists,
//! keyword sets, name-length limits, timezone offsets) lives here as data.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const EDGAR_CURRENT_FEED: &str = "https://www.sec.gov/cgi-bin/browse-edgar";

/// Largest UTC offset accepted for either timezone (±14h).
const MAX_OFFSET_SECS: i32 = 14 * 3600;

/// Content shape a source declares for its response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentShape {
    Atom,
    Rss,
    Html,
    SearchJson,
}

impl std::fmt::Display for ContentShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentShape::Atom => write!(f, "atom"),
            ContentShape::Rss => write!(f, "rss"),
            ContentShape::Html => write!(f, "html"),
            ContentShape::SearchJson => write!(f, "search_json"),
        }
    }
}

/// One remote endpoint polled during a report cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    pub shape: ContentShape,
    /// Form type the endpoint is scoped to; used when an entry carries none.
    #[serde(default)]
    pub form_type: Option<String>,
}

impl FeedSource {
    /// EDGAR "latest filings" Atom feed for a single form type.
    #[must_use]
    pub fn edgar_current(form_type: &str) -> Self {
        Self {
            name: format!("edgar-current-{}", form_type.to_lowercase()),
            url: format!(
                "{EDGAR_CURRENT_FEED}?action=getcurrent&type={form_type}&company=&dateb=&owner=include&start=0&count=100&output=atom"
            ),
            shape: ContentShape::Atom,
            form_type: Some(form_type.to_string()),
        }
    }
}

/// Tunables for classification, extraction and formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub allowed_form_types: BTreeSet<String>,
    pub excluded_form_types: BTreeSet<String>,
    pub etf_keywords: BTreeSet<String>,
    pub exclusion_keywords: BTreeSet<String>,
    /// Form types whose `/A` suffixed variants are always rejected.
    pub amendment_suffix_form_types: BTreeSet<String>,
    pub require_allowed_form_type: bool,
    pub min_name_length: usize,
    pub max_name_length: usize,
    /// Cosmetic truncation budget used by the report formatter.
    pub display_name_length: usize,
    /// Filings listed individually; the rest are summarized in one line so
    /// the digest stays within Telegram's 4096-character message limit.
    pub max_listed_filings: usize,
    #[serde(with = "utc_offset")]
    pub source_timezone_offset: FixedOffset,
    #[serde(with = "utc_offset")]
    pub local_timezone_offset: FixedOffset,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            allowed_form_types: string_set(&["N-1A", "S-1", "485APOS"]),
            excluded_form_types: string_set(&["485BPOS", "497", "497K", "N-CSR"]),
            etf_keywords: string_set(&["etf", "exchange-traded", "exchange traded"]),
            exclusion_keywords: string_set(&[
                "amendment",
                "withdrawal",
                "termination",
                "liquidation",
                "merger",
            ]),
            amendment_suffix_form_types: string_set(&["N-1A", "S-1"]),
            require_allowed_form_type: true,
            min_name_length: 5,
            max_name_length: 100,
            display_name_length: 60,
            max_listed_filings: 10,
            source_timezone_offset: hours_offset(-5),
            local_timezone_offset: hours_offset(9),
        }
    }
}

impl ReportSettings {
    /// Returns true if `form_type` is on the allow-list (case-insensitive).
    #[must_use]
    pub fn is_allowed_form_type(&self, form_type: &str) -> bool {
        contains_ignore_case(&self.allowed_form_types, form_type)
    }

    /// Returns true if `form_type` is on the deny-list (case-insensitive).
    #[must_use]
    pub fn is_excluded_form_type(&self, form_type: &str) -> bool {
        contains_ignore_case(&self.excluded_form_types, form_type)
    }

    /// Returns true if `/A` amendments of `base_form_type` must be rejected.
    #[must_use]
    pub fn rejects_amendment_suffix(&self, base_form_type: &str) -> bool {
        contains_ignore_case(&self.amendment_suffix_form_types, base_form_type)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_name_length == 0 {
            return Err(ConfigError::Validation(
                "min_name_length must be at least 1".to_string(),
            ));
        }
        if self.max_name_length < self.min_name_length {
            return Err(ConfigError::Validation(format!(
                "max_name_length ({}) must be >= min_name_length ({})",
                self.max_name_length, self.min_name_length
            )));
        }
        if self.display_name_length == 0 {
            return Err(ConfigError::Validation(
                "display_name_length must be at least 1".to_string(),
            ));
        }
        if self.max_listed_filings == 0 {
            return Err(ConfigError::Validation(
                "max_listed_filings must be at least 1".to_string(),
            ));
        }
        if self.etf_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "etf_keywords must contain at least one keyword".to_string(),
            ));
        }
        Ok(())
    }
}

/// Contents of the report config file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFile {
    pub settings: ReportSettings,
    pub sources: Vec<FeedSource>,
}

impl ReportFile {
    /// Settings plus one EDGAR current-filings feed per allowed form type.
    #[must_use]
    pub fn with_default_sources(settings: ReportSettings) -> Self {
        let sources = default_sources(&settings);
        Self { settings, sources }
    }
}

/// Load and validate the report configuration from a YAML file.
///
/// An empty `sources` list is filled with the default EDGAR feeds.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_report_file(path: &Path) -> Result<ReportFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReportFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_report_file(&content)
}

/// Like [`load_report_file`], but a missing file yields the built-in defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, parsed, or
/// fails validation.
pub fn load_report_file_or_default(path: &Path) -> Result<ReportFile, ConfigError> {
    if path.exists() {
        load_report_file(path)
    } else {
        Ok(ReportFile::with_default_sources(ReportSettings::default()))
    }
}

pub(crate) fn parse_report_file(content: &str) -> Result<ReportFile, ConfigError> {
    let mut file: ReportFile = serde_yaml::from_str(content)?;
    if file.sources.is_empty() {
        file.sources = default_sources(&file.settings);
    }
    validate_report_file(&file)?;
    Ok(file)
}

fn validate_report_file(file: &ReportFile) -> Result<(), ConfigError> {
    file.settings.validate()?;

    let mut seen = HashSet::new();
    for source in &file.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(source.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{}'",
                source.name
            )));
        }
        if !(source.url.starts_with("http://") || source.url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "source '{}' has a non-http url: '{}'",
                source.name, source.url
            )));
        }
    }

    Ok(())
}

fn default_sources(settings: &ReportSettings) -> Vec<FeedSource> {
    settings
        .allowed_form_types
        .iter()
        .map(|form| FeedSource::edgar_current(form))
        .collect()
}

fn string_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn contains_ignore_case(set: &BTreeSet<String>, value: &str) -> bool {
    let value = value.trim();
    set.iter().any(|s| s.trim().eq_ignore_ascii_case(value))
}

fn hours_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).expect("literal offset within ±14h")
}

/// Parse a UTC offset written as `+09:00`, `-0500`, `+9`, `Z`, or `UTC`.
#[must_use]
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }

    let secs = sign * (hours * 3600 + minutes * 60);
    if secs.abs() > MAX_OFFSET_SECS {
        return None;
    }
    FixedOffset::east_opt(secs)
}

mod utc_offset {
    use chrono::FixedOffset;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(offset: &FixedOffset, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&offset.to_string())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<FixedOffset, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_utc_offset(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid UTC offset '{raw}'")))
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
