//! Feed parsing: turns a response body into [`RawEntry`] values.
//!
//! The parser is picked from the source's declared [`ContentShape`]. XML
//! shapes share one streaming parser that probes the root tag, HTML falls
//! back to regex block extraction, and search results are JSON.

mod html;
mod search;
mod xml;

use etfwatch_core::ContentShape;

use crate::error::ParseError;
use crate::types::RawEntry;

pub use html::parse_html_entries;
pub use search::parse_search_results;
pub use xml::parse_xml_feed;

/// Parse `body` according to `shape`.
///
/// `base_url` resolves relative links found in HTML and search results.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] for malformed XML and [`ParseError::Json`]
/// for an undecodable search response. HTML extraction never fails.
pub fn parse_feed(
    body: &str,
    shape: ContentShape,
    base_url: &str,
) -> Result<Vec<RawEntry>, ParseError> {
    match shape {
        ContentShape::Atom | ContentShape::Rss => parse_xml_feed(body, shape),
        ContentShape::Html => Ok(parse_html_entries(body, base_url)),
        ContentShape::SearchJson => parse_search_results(body),
    }
}

/// Resolve `href` against `base`, leaving absolute URLs untouched.
pub(crate) fn resolve_link(href: &str, base: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    reqwest::Url::parse(base)
        .and_then(|b| b.join(href))
        .ok()
        .map(String::from)
}
