//! EDGAR filing collection for etfwatch.
//!
//! Fetches feeds and search results from SEC EDGAR, parses them into
//! [`RawEntry`] values, classifies each entry into a [`etfwatch_core::Filing`]
//! (or a typed [`Rejection`]), and deduplicates the combined result set.

pub mod classify;
pub mod client;
pub mod dedup;
pub mod error;
pub mod feed;
pub mod sources;
pub mod text;
pub mod types;

pub use classify::{classify, parse_filing_date, resolve_form_type, Rejection};
pub use client::{EdgarClient, FetchRequest, FetchResponse, HttpMethod};
pub use dedup::{dedup_and_sort, dedup_by_url, sort_by_date_desc};
pub use error::{EdgarError, FetchError, ParseError};
pub use feed::parse_feed;
pub use sources::{
    classify_entries, collect_filings, collect_source, CollectionOutcome, SourceFailure,
};
pub use types::RawEntry;
