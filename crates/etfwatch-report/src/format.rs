//! Telegram-HTML rendering of the daily digest.
//!
//! Every piece of dynamic text goes through [`escape_html`]; the only markup
//! in the output is what this module writes itself.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Utc};
use etfwatch_core::{Filing, ReportSettings};
use etfwatch_edgar::text::{escape_html, truncate_chars};
use etfwatch_telegram::CredentialStatus;

/// Body paragraph used when a cycle found nothing.
pub const NO_FILINGS_TEXT: &str = "No new ETF registration filings today.";

const ELLIPSIS: char = '…';

/// Render the digest for `filings` as generated at `now`.
///
/// Names longer than `display_name_length` are shortened with `…`; the
/// underlying [`Filing`] values are not changed. Only the first
/// `max_listed_filings` are written out; the count header still covers all.
#[must_use]
pub fn format_report(filings: &[Filing], now: DateTime<Utc>, settings: &ReportSettings) -> String {
    let local = now.with_timezone(&settings.local_timezone_offset);
    let source = now.with_timezone(&settings.source_timezone_offset);

    let mut out = String::new();
    out.push_str("📋 <b>SEC New ETF Registration Briefing</b>\n");
    let _ = writeln!(
        out,
        "📅 {} (UTC{})",
        local.format("%Y-%m-%d %H:%M"),
        settings.local_timezone_offset
    );
    let _ = writeln!(
        out,
        "🇺🇸 {} (UTC{})",
        source.format("%Y-%m-%d %H:%M"),
        settings.source_timezone_offset
    );
    out.push('\n');

    if filings.is_empty() {
        out.push_str(NO_FILINGS_TEXT);
        out.push('\n');
    } else {
        let _ = writeln!(out, "🆕 <b>New ETF registrations: {}</b>\n", filings.len());
        let listed = settings.max_listed_filings.max(1);
        for filing in filings.iter().take(listed) {
            write_filing(&mut out, filing, settings.display_name_length);
        }
        let remaining = filings.len().saturating_sub(listed);
        if remaining > 0 {
            let _ = writeln!(out, "➕ …and {remaining} more on EDGAR");
        }
    }

    let _ = write!(
        out,
        "\n⏰ Sent {} (UTC{})",
        local.format("%H:%M"),
        settings.local_timezone_offset
    );
    out
}

fn write_filing(out: &mut String, filing: &Filing, display_name_length: usize) {
    let _ = writeln!(
        out,
        "📈 <b>{}</b>",
        escape_html(&display_name(&filing.name, display_name_length))
    );
    if let Some(company) = filing.company.as_deref() {
        let _ = writeln!(out, "• Company: {}", escape_html(company));
    }
    let _ = writeln!(out, "• Form type: {}", escape_html(&filing.form_type));
    let _ = writeln!(out, "• Filed: {}", filing.filing_date.format("%Y-%m-%d"));
    let _ = writeln!(
        out,
        "🔗 <a href=\"{}\">View SEC filing</a>\n",
        escape_html(&filing.url)
    );
}

fn display_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut shortened = truncate_chars(name, keep).trim_end().to_string();
    shortened.push(ELLIPSIS);
    shortened
}

/// Message sent by the connectivity check.
#[must_use]
pub fn format_connectivity_test(
    now: DateTime<Utc>,
    local_offset: FixedOffset,
    credentials: &CredentialStatus,
) -> String {
    let local = now.with_timezone(&local_offset);
    let mark = |set: bool| if set { "✅ set" } else { "❌ not set" };
    format!(
        "🔧 <b>Telegram connectivity test</b>\n\n\
         ✅ Bot connection OK\n\
         ⏰ {} (UTC{local_offset})\n\n\
         Credentials:\n\
         • Bot token: {}\n\
         • Chat ID: {}",
        local.format("%Y-%m-%d %H:%M:%S"),
        mark(credentials.bot_token_set),
        mark(credentials.chat_id_set),
    )
}
