//! Turns a [`RawEntry`] into a [`Filing`], or a typed [`Rejection`].
//!
//! Classification runs in two stages. [`qualify`] resolves the form type and
//! applies the form-type and keyword gates; [`extract`] pulls the display
//! name, company and filing date out of the entry text.

mod extract;
mod qualify;

use std::fmt;

use etfwatch_core::{Filing, ReportSettings};

use crate::types::RawEntry;

pub use extract::parse_filing_date;
pub use qualify::resolve_form_type;

/// Why an entry did not become a [`Filing`].
///
/// Rejections are expected outcomes, not failures; the collector logs them
/// at debug and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Form type is on the deny-list.
    DeniedFormType(String),
    /// An `/A` amendment of a form type whose amendments are rejected.
    AmendmentSuffix(String),
    /// The allow-list is required and the form type is missing or not on it.
    FormTypeNotAllowed(Option<String>),
    /// No form type could be resolved and none is required.
    NoFormType,
    NotEtf,
    ExcludedKeyword(String),
    NoName,
    NoDate,
    NoLink,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::DeniedFormType(form) => write!(f, "form type {form} is excluded"),
            Rejection::AmendmentSuffix(form) => write!(f, "amendment filing {form}"),
            Rejection::FormTypeNotAllowed(Some(form)) => {
                write!(f, "form type {form} is not allowed")
            }
            Rejection::FormTypeNotAllowed(None) => write!(f, "form type could not be resolved"),
            Rejection::NoFormType => write!(f, "no form type"),
            Rejection::NotEtf => write!(f, "no ETF keyword"),
            Rejection::ExcludedKeyword(keyword) => write!(f, "excluded keyword \"{keyword}\""),
            Rejection::NoName => write!(f, "no usable name"),
            Rejection::NoDate => write!(f, "missing or unparseable date"),
            Rejection::NoLink => write!(f, "missing link"),
        }
    }
}

/// Classify one entry.
///
/// `source_form_type` is the form type the source is scoped to; it is only
/// used when neither the entry nor its title names one.
///
/// # Errors
///
/// Returns the first [`Rejection`] that applies. Qualification gates are
/// checked before extraction, so a non-ETF entry is reported as
/// [`Rejection::NotEtf`] even if it also lacks a date.
pub fn classify(
    entry: &RawEntry,
    source_form_type: Option<&str>,
    settings: &ReportSettings,
) -> Result<Filing, Rejection> {
    let form_type = qualify::qualify(entry, source_form_type, settings)?;

    let name = extract::extract_name(entry, settings).ok_or(Rejection::NoName)?;
    let filing_date = entry
        .updated
        .as_deref()
        .and_then(|raw| parse_filing_date(raw, settings.source_timezone_offset))
        .ok_or(Rejection::NoDate)?;

    let url = entry.link.trim();
    if url.is_empty() {
        return Err(Rejection::NoLink);
    }

    let company = extract::extract_company(&entry.title, &name, &form_type);

    Ok(Filing {
        name,
        form_type,
        filing_date,
        url: url.to_string(),
        company,
    })
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
