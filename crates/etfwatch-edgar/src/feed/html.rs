//! Regex fallback for sources that only serve HTML (or XML too broken for
//! the streaming parser).
//!
//! Block extraction is tried in order: `<entry>` blocks, `<item>` blocks,
//! then table rows that contain a link. Whichever shape yields entries first
//! is used for the whole document.

use std::sync::LazyLock;

use regex::Regex;

use super::resolve_link;
use crate::text::to_plain_text;
use crate::types::RawEntry;

static ENTRY_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<entry\b[^>]*>(.*?)</entry>").expect("valid regex"));
static ITEM_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<item\b[^>]*>(.*?)</item>").expect("valid regex"));
static ROW_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("valid regex"));

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").expect("valid regex"));
static LINK_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<link\b[^>]*?href\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});
static LINK_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>(.*?)</link>").expect("valid regex"));
static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:summary|description|content)\b[^>]*>(.*?)</(?:summary|description|content)>")
        .expect("valid regex")
});
static UPDATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:updated|published|pubDate)\b[^>]*>(.*?)</(?:updated|published|pubDate)>")
        .expect("valid regex")
});
static TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<category\b[^>]*?term\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});
static CDATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*<!\[CDATA\[(.*?)\]\]>\s*$").expect("valid regex"));

static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").expect("valid regex"));
static ANCHOR_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?href\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("valid regex"));

/// Extract raw entries from an HTML (or HTML-like) document.
///
/// Never fails; an unrecognised document yields an empty list.
#[must_use]
pub fn parse_html_entries(html: &str, base_url: &str) -> Vec<RawEntry> {
    let feed_blocks = if ENTRY_BLOCK_RE.is_match(html) {
        Some(&*ENTRY_BLOCK_RE)
    } else if ITEM_BLOCK_RE.is_match(html) {
        Some(&*ITEM_BLOCK_RE)
    } else {
        None
    };

    if let Some(block_re) = feed_blocks {
        return block_re
            .captures_iter(html)
            .filter_map(|cap| cap.get(1))
            .filter_map(|m| parse_feed_block(m.as_str(), base_url))
            .collect();
    }

    ROW_BLOCK_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .filter_map(|m| parse_table_row(m.as_str(), base_url))
        .collect()
}

fn parse_feed_block(block: &str, base_url: &str) -> Option<RawEntry> {
    let title = first_capture(&TITLE_RE, block)
        .map(|t| to_plain_text(unwrap_cdata(t)))
        .unwrap_or_default();

    let link = first_capture(&LINK_HREF_RE, block)
        .or_else(|| first_capture(&LINK_TEXT_RE, block))
        .map(|l| to_plain_text(unwrap_cdata(l)))
        .and_then(|l| resolve_link(&l, base_url))
        .unwrap_or_default();

    if title.is_empty() && link.is_empty() {
        return None;
    }

    Some(RawEntry {
        title,
        link,
        summary: first_capture(&SUMMARY_RE, block).map(|s| unwrap_cdata(s).trim().to_string()),
        updated: first_capture(&UPDATED_RE, block).map(to_plain_text),
        form_type: first_capture(&TERM_RE, block).map(|t| t.trim().to_string()),
    })
}

/// A table row becomes an entry when it has at least one cell and a link.
/// The cells' text is joined with ` - ` to form the title.
fn parse_table_row(row: &str, base_url: &str) -> Option<RawEntry> {
    let href = first_capture(&ANCHOR_HREF_RE, row)?;
    let link = resolve_link(&crate::text::decode_entities(href), base_url)?;

    let cells: Vec<String> = CELL_RE
        .captures_iter(row)
        .filter_map(|cap| cap.get(1))
        .map(|m| to_plain_text(m.as_str()))
        .filter(|c| !c.is_empty())
        .collect();
    if cells.is_empty() {
        return None;
    }

    let updated = cells
        .iter()
        .find_map(|c| ISO_DATE_RE.captures(c).and_then(|cap| cap.get(1)))
        .map(|m| m.as_str().to_string());

    Some(RawEntry {
        title: cells.join(" - "),
        link,
        summary: None,
        updated,
        form_type: None,
    })
}

fn first_capture<'a>(re: &Regex, haystack: &'a str) -> Option<&'a str> {
    re.captures(haystack)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.trim().is_empty())
}

fn unwrap_cdata(s: &str) -> &str {
    CDATA_RE
        .captures(s)
        .and_then(|cap| cap.get(1))
        .map_or(s, |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.sec.gov/cgi-bin/browse-edgar?action=getcurrent";

    #[test]
    fn extracts_entry_blocks_from_broken_atom() {
        // Unclosed <feed> and a stray ampersand would trip a strict XML parser.
        let body = r#"<feed><entry>
  <title>Acme Space ETF - Form N-1A</title>
  <link rel="alternate" href="/Archives/edgar/data/1/0001-index.htm"/>
  <summary type="html">Filed & accepted</summary>
  <updated>2025-01-13T10:00:00-05:00</updated>
  <category term="N-1A"/>
</entry>"#;
        let entries = parse_html_entries(body, BASE);
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.title, "Acme Space ETF - Form N-1A");
        assert_eq!(e.link, "https://www.sec.gov/Archives/edgar/data/1/0001-index.htm");
        assert_eq!(e.summary.as_deref(), Some("Filed & accepted"));
        assert_eq!(e.updated.as_deref(), Some("2025-01-13T10:00:00-05:00"));
        assert_eq!(e.form_type.as_deref(), Some("N-1A"));
    }

    #[test]
    fn extracts_item_blocks_with_cdata() {
        let body = r"<rss><channel><item>
<title><![CDATA[Beta Treasury ETF]]></title>
<link>https://example.com/beta</link>
<pubDate>Tue, 14 Jan 2025 10:00:00 -0500</pubDate>
</item></channel>";
        let entries = parse_html_entries(body, BASE);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Beta Treasury ETF");
        assert_eq!(entries[0].link, "https://example.com/beta");
    }

    #[test]
    fn extracts_table_rows_with_links() {
        let body = r#"<table>
<tr><th>Form</th><th>Description</th></tr>
<tr><td>N-1A</td><td><a href="/Archives/edgar/data/2/0002-index.htm">Gamma Dividend ETF</a></td><td>2025-01-14</td></tr>
<tr><td>no link here</td></tr>
</table>"#;
        let entries = parse_html_entries(body, BASE);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "N-1A - Gamma Dividend ETF - 2025-01-14");
        assert_eq!(
            entries[0].link,
            "https://www.sec.gov/Archives/edgar/data/2/0002-index.htm"
        );
        assert_eq!(entries[0].updated.as_deref(), Some("2025-01-14"));
    }

    #[test]
    fn blocks_without_title_or_link_are_skipped() {
        let body = "<entry><summary>nothing useful</summary></entry>";
        assert!(parse_html_entries(body, BASE).is_empty());
    }
}
