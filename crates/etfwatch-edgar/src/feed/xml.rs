//! Streaming Atom/RSS parser built on quick-xml.
//!
//! Tags are matched by local name, so `atom:entry`, `entry` with a missing
//! default namespace, and `dc:date` all resolve the same way. The root tag is
//! probed to decide which element delimits an entry.

use etfwatch_core::ContentShape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::text::decode_entities;
use crate::types::RawEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedKind {
    Atom,
    Rss,
    Unknown,
}

impl FeedKind {
    fn probe(root: &str) -> Self {
        match root {
            "feed" => FeedKind::Atom,
            "rss" | "RDF" => FeedKind::Rss,
            _ => FeedKind::Unknown,
        }
    }

    fn is_entry_tag(self, local: &str) -> bool {
        match self {
            FeedKind::Atom => local == "entry",
            FeedKind::Rss => local == "item",
            FeedKind::Unknown => local == "entry" || local == "item",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Summary,
    Content,
    Updated,
    Published,
    FormType,
}

impl Field {
    fn from_local(local: &str) -> Option<Self> {
        match local {
            "title" => Some(Field::Title),
            "link" => Some(Field::Link),
            "summary" | "description" => Some(Field::Summary),
            "content" | "encoded" => Some(Field::Content),
            "updated" | "modified" => Some(Field::Updated),
            "published" | "pubDate" | "date" | "issued" => Some(Field::Published),
            "formType" | "form-type" => Some(Field::FormType),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct EntryBuilder {
    title: String,
    link: String,
    summary: String,
    content: String,
    updated: String,
    published: String,
    form_type: String,
}

impl EntryBuilder {
    fn buffer(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Summary => &mut self.summary,
            Field::Content => &mut self.content,
            Field::Updated => &mut self.updated,
            Field::Published => &mut self.published,
            Field::FormType => &mut self.form_type,
        }
    }

    fn push_text(&mut self, field: Field, text: &str) {
        let buf = self.buffer(field);
        if !buf.is_empty() && !buf.ends_with('>') && !text.starts_with('<') {
            buf.push(' ');
        }
        buf.push_str(text);
    }

    /// Apply attributes of an element that may carry data in attributes
    /// (`<link href>`, `<category term>`).
    fn absorb_attributes(&mut self, local: &str, element: &BytesStart<'_>) {
        match local {
            "link" => {
                if !self.link.is_empty() {
                    return;
                }
                let mut href = None;
                let mut rel = None;
                for attr in element.attributes().flatten() {
                    let value = attr.unescape_value().ok().map(|v| v.trim().to_string());
                    match attr.key.local_name().as_ref() {
                        b"href" => href = value,
                        b"rel" => rel = value,
                        _ => {}
                    }
                }
                let is_alternate = rel.as_deref().map_or(true, |r| r == "alternate");
                if let (Some(href), true) = (href, is_alternate) {
                    self.link = href;
                }
            }
            "category" => {
                if !self.form_type.is_empty() {
                    return;
                }
                for attr in element.attributes().flatten() {
                    if attr.key.local_name().as_ref() == b"term" {
                        if let Ok(term) = attr.unescape_value() {
                            self.form_type = term.trim().to_string();
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Option<RawEntry> {
        let title = self.title.trim().to_string();
        let link = self.link.trim().to_string();
        if title.is_empty() && link.is_empty() {
            return None;
        }

        let summary = if self.summary.trim().is_empty() {
            self.content
        } else {
            self.summary
        };
        let updated = if self.updated.trim().is_empty() {
            self.published
        } else {
            self.updated
        };

        Some(RawEntry {
            title,
            link,
            summary: non_empty(summary),
            updated: non_empty(updated),
            form_type: non_empty(self.form_type),
        })
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn local_name_of(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

/// Parse an Atom or RSS document into raw entries.
///
/// Entries with neither a title nor a link are skipped. When the probed root
/// tag disagrees with `declared`, the probed kind wins.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] if the document is not well-formed.
pub fn parse_xml_feed(xml: &str, declared: ContentShape) -> Result<Vec<RawEntry>, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut kind: Option<FeedKind> = None;
    let mut entries = Vec::new();
    let mut current: Option<EntryBuilder> = None;
    // Active field plus the depth of markup nested inside it.
    let mut active: Option<(Field, String, usize)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let local = local_name_of(&e);
                let feed_kind = *kind.get_or_insert_with(|| probe_root(&local, declared));

                if let Some((field, _, depth)) = active.as_mut() {
                    if *field == Field::Summary || *field == Field::Content {
                        if let Some(entry) = current.as_mut() {
                            entry.push_text(*field, &format!("<{local}>"));
                        }
                    }
                    *depth += 1;
                    continue;
                }

                if feed_kind.is_entry_tag(&local) {
                    current = Some(EntryBuilder::default());
                } else if let Some(entry) = current.as_mut() {
                    let had_link = !entry.link.is_empty();
                    entry.absorb_attributes(&local, &e);
                    match Field::from_local(&local) {
                        // `<link href="…">…</link>`: the attribute already won.
                        Some(Field::Link) if had_link || !entry.link.is_empty() => {}
                        Some(field) => active = Some((field, local, 0)),
                        None => {}
                    }
                }
            }
            Event::Empty(e) => {
                let local = local_name_of(&e);
                kind.get_or_insert_with(|| probe_root(&local, declared));
                if active.is_none() {
                    if let Some(entry) = current.as_mut() {
                        entry.absorb_attributes(&local, &e);
                    }
                }
            }
            Event::End(e) => {
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

                if let Some((field, tag, depth)) = active.as_mut() {
                    if *depth == 0 && *tag == local {
                        active = None;
                    } else {
                        if *field == Field::Summary || *field == Field::Content {
                            if let Some(entry) = current.as_mut() {
                                entry.push_text(*field, &format!("</{local}>"));
                            }
                        }
                        *depth = depth.saturating_sub(1);
                    }
                    continue;
                }

                let feed_kind = kind.unwrap_or(FeedKind::Unknown);
                if feed_kind.is_entry_tag(&local) {
                    if let Some(entry) = current.take().and_then(EntryBuilder::finish) {
                        entries.push(entry);
                    }
                }
            }
            Event::Text(e) => {
                if let (Some((field, _, _)), Some(entry)) = (active.as_ref(), current.as_mut()) {
                    let text = e.unescape().map_or_else(
                        |_| decode_entities(&String::from_utf8_lossy(&e)),
                        std::borrow::Cow::into_owned,
                    );
                    entry.push_text(*field, &text);
                }
            }
            Event::CData(e) => {
                if let (Some((field, _, _)), Some(entry)) = (active.as_ref(), current.as_mut()) {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    entry.push_text(*field, &text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn probe_root(root: &str, declared: ContentShape) -> FeedKind {
    let probed = FeedKind::probe(root);
    let expected = match declared {
        ContentShape::Rss => FeedKind::Rss,
        _ => FeedKind::Atom,
    };
    if probed != expected {
        tracing::debug!(root, declared = %declared, "feed root tag differs from declared shape");
    }
    probed
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGAR_ATOM: &str = r#"<?xml version="1.0" encoding="ISO-8859-1" ?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Latest Filings - Mon, 13 Jan 2025 16:10:01 EST</title>
  <link rel="alternate" href="/cgi-bin/browse-edgar?action=getcurrent"/>
  <updated>2025-01-13T16:10:01-05:00</updated>
  <entry>
    <title>N-1A - iShares Trust (0001100663) (Filer)</title>
    <link rel="alternate" type="text/html" href="https://www.sec.gov/Archives/edgar/data/1100663/000110066325000010/0001100663-25-000010-index.htm"/>
    <summary type="html"> &lt;b&gt;Filed:&lt;/b&gt; 2025-01-13 &lt;b&gt;AccNo:&lt;/b&gt; 0001100663-25-000010 &lt;b&gt;Size:&lt;/b&gt; 2 MB</summary>
    <updated>2025-01-13T16:05:23-05:00</updated>
    <category scheme="https://www.sec.gov/" label="form type" term="N-1A"/>
    <id>urn:tag:sec.gov,2008:accession-number=0001100663-25-000010</id>
  </entry>
  <entry>
    <title>S-1 - Grayscale Solana Trust ETF (0001896677) (Filer)</title>
    <link rel="alternate" type="text/html" href="https://www.sec.gov/Archives/edgar/data/1896677/000119312525000111/0001193125-25-000111-index.htm"/>
    <updated>2025-01-13T15:30:00-05:00</updated>
    <category scheme="https://www.sec.gov/" label="form type" term="S-1"/>
  </entry>
</feed>"#;

    #[test]
    fn parses_edgar_atom_entries() {
        let entries = parse_xml_feed(EDGAR_ATOM, ContentShape::Atom).expect("valid atom");
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.title, "N-1A - iShares Trust (0001100663) (Filer)");
        assert!(first.link.ends_with("0001100663-25-000010-index.htm"));
        assert_eq!(first.updated.as_deref(), Some("2025-01-13T16:05:23-05:00"));
        assert_eq!(first.form_type.as_deref(), Some("N-1A"));
        let summary = first.summary.as_deref().unwrap();
        assert!(summary.contains("<b>Filed:</b>"), "summary: {summary}");

        assert_eq!(entries[1].form_type.as_deref(), Some("S-1"));
        assert!(entries[1].summary.is_none());
    }

    #[test]
    fn feed_level_link_and_title_are_ignored() {
        let entries = parse_xml_feed(EDGAR_ATOM, ContentShape::Atom).unwrap();
        assert!(entries.iter().all(|e| !e.title.starts_with("Latest Filings")));
    }

    #[test]
    fn parses_prefixed_atom_namespace() {
        let xml = r#"<atom:feed xmlns:atom="http://www.w3.org/2005/Atom">
  <atom:entry>
    <atom:title>Example Bitcoin ETF - Form S-1</atom:title>
    <atom:link href="https://example.com/1"/>
    <atom:updated>2025-02-01T09:00:00Z</atom:updated>
  </atom:entry>
</atom:feed>"#;
        let entries = parse_xml_feed(xml, ContentShape::Atom).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "https://example.com/1");
        assert_eq!(entries[0].updated.as_deref(), Some("2025-02-01T09:00:00Z"));
    }

    #[test]
    fn parses_rss_items_with_cdata_description() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Fund filings</title>
    <link>https://example.com</link>
    <item>
      <title>Acme Clean Energy ETF - Form N-1A</title>
      <link>https://example.com/filings/1</link>
      <description><![CDATA[<b>Acme Clean Energy ETF</b> initial registration]]></description>
      <pubDate>Tue, 14 Jan 2025 10:00:00 -0500</pubDate>
    </item>
    <item>
      <title></title>
      <link></link>
    </item>
  </channel>
</rss>"#;
        let entries = parse_xml_feed(xml, ContentShape::Rss).unwrap();
        assert_eq!(entries.len(), 1, "item without title and link is skipped");
        assert_eq!(entries[0].link, "https://example.com/filings/1");
        assert_eq!(
            entries[0].summary.as_deref(),
            Some("<b>Acme Clean Energy ETF</b> initial registration")
        );
        assert_eq!(
            entries[0].updated.as_deref(),
            Some("Tue, 14 Jan 2025 10:00:00 -0500")
        );
    }

    #[test]
    fn probed_root_wins_over_declared_shape() {
        let xml = r#"<rss><channel><item><title>X Fund ETF</title><link>https://e.com/x</link></item></channel></rss>"#;
        let entries = parse_xml_feed(xml, ContentShape::Atom).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn xhtml_content_keeps_nested_markup() {
        let xml = r#"<feed><entry><title>t</title><link href="https://e.com/1"/>
<content type="xhtml"><div>Series Name: <b>Zeta Income ETF</b></div></content></entry></feed>"#;
        let entries = parse_xml_feed(xml, ContentShape::Atom).unwrap();
        let summary = entries[0].summary.as_deref().unwrap();
        assert!(summary.contains("<b>Zeta Income ETF</b>"), "summary: {summary}");
    }

    #[test]
    fn mismatched_tags_are_an_error() {
        let xml = "<feed><entry><title>Broken</wrong></entry></feed>";
        assert!(matches!(
            parse_xml_feed(xml, ContentShape::Atom),
            Err(ParseError::Xml(_))
        ));
    }

    #[test]
    fn empty_feed_returns_empty_vec() {
        let xml = r#"<?xml version="1.0"?><feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;
        assert!(parse_xml_feed(xml, ContentShape::Atom).unwrap().is_empty());
    }
}
