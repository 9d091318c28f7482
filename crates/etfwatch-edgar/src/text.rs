//! Plain-text cleanup helpers shared by the parsers and the name extractor.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,10});")
        .expect("valid regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

/// Decode named and numeric character references.
///
/// Unknown named entities are left untouched.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    ENTITY_RE
        .replace_all(input, |caps: &Captures<'_>| {
            let body = &caps[1];
            decode_entity(body).map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = body.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    let c = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '–',
        "mdash" => '—',
        "rsquo" => '’',
        "lsquo" => '‘',
        "rdquo" => '”',
        "ldquo" => '“',
        "reg" => '®',
        "trade" => '™',
        "copy" => '©',
        _ => return None,
    };
    Some(c)
}

/// Replace markup tags with a single space.
#[must_use]
pub fn strip_tags(input: &str) -> String {
    TAG_RE.replace_all(input, " ").into_owned()
}

/// Collapse runs of whitespace (and control characters) into single spaces.
#[must_use]
pub fn collapse_whitespace(input: &str) -> String {
    input
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode entities, strip tags, then collapse whitespace.
///
/// Entities are decoded before tags are stripped so escaped markup
/// (`&lt;b&gt;`) is removed too.
#[must_use]
pub fn to_plain_text(input: &str) -> String {
    collapse_whitespace(&strip_tags(&decode_entities(input)))
}

/// Escape text for Telegram's HTML parse mode.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Truncate to at most `max_chars` characters without splitting a code point.
#[must_use]
pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}
