//! EDGAR full-text search (EFTS) response mapping.
//!
//! The search API answers with an Elasticsearch-style envelope. Each hit's
//! `_id` is `"{accession}:{file name}"`; the document link is rebuilt from the
//! first CIK, the accession number without dashes, and that file name.

use serde::Deserialize;

use crate::error::ParseError;
use crate::types::RawEntry;

const ARCHIVES_BASE: &str = "https://www.sec.gov/Archives/edgar/data";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: SearchHits,
}

#[derive(Debug, Default, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(rename = "_source", default)]
    source: HitSource,
}

#[derive(Debug, Default, Deserialize)]
struct HitSource {
    #[serde(default)]
    display_names: Vec<String>,
    #[serde(default)]
    form: Option<String>,
    #[serde(default)]
    file_date: Option<String>,
    #[serde(default)]
    adsh: Option<String>,
    #[serde(default)]
    ciks: Vec<String>,
    #[serde(default)]
    file_description: Option<String>,
}

/// Map an EFTS JSON body to raw entries.
///
/// Hits missing an accession number, a CIK, or a display name are skipped.
///
/// # Errors
///
/// Returns [`ParseError::Json`] if the body is not valid JSON for the
/// search envelope.
pub fn parse_search_results(body: &str) -> Result<Vec<RawEntry>, ParseError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .hits
        .hits
        .into_iter()
        .filter_map(hit_to_entry)
        .collect())
}

fn hit_to_entry(hit: SearchHit) -> Option<RawEntry> {
    let source = hit.source;
    let display_name = source
        .display_names
        .iter()
        .map(|n| n.trim())
        .find(|n| !n.is_empty())?;
    let adsh = source
        .adsh
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .or_else(|| hit.id.split(':').next().filter(|a| !a.is_empty()))?;
    let cik = source
        .ciks
        .iter()
        .map(|c| c.trim().trim_start_matches('0'))
        .find(|c| !c.is_empty())?;

    let folder = adsh.replace('-', "");
    let link = match hit.id.split_once(':') {
        Some((_, file)) if !file.trim().is_empty() => {
            format!("{ARCHIVES_BASE}/{cik}/{folder}/{}", file.trim())
        }
        _ => format!("{ARCHIVES_BASE}/{cik}/{folder}/{adsh}-index.htm"),
    };

    let form = source.form.map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
    let title = match form.as_deref() {
        Some(form) => format!("{form} - {display_name}"),
        None => display_name.to_string(),
    };

    Some(RawEntry {
        title,
        link,
        summary: source.file_description.filter(|d| !d.trim().is_empty()),
        updated: source.file_date,
        form_type: form,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
  "hits": {
    "total": {"value": 2},
    "hits": [
      {
        "_id": "0001104659-25-003456:tm251234d1_n1a.htm",
        "_source": {
          "display_names": ["Roundhill ETF Trust  (CIK 0001976517)"],
          "form": "N-1A",
          "file_date": "2025-01-14",
          "adsh": "0001104659-25-003456",
          "ciks": ["0001976517"],
          "file_description": "Roundhill Humanoid Robotics ETF"
        }
      },
      {
        "_id": "0000000000-25-000001:x.htm",
        "_source": {"display_names": [], "form": "S-1", "ciks": ["0000000001"]}
      }
    ]
  }
}"#;

    #[test]
    fn maps_hit_to_archives_link() {
        let entries = parse_search_results(SAMPLE).unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(
            e.link,
            "https://www.sec.gov/Archives/edgar/data/1976517/000110465925003456/tm251234d1_n1a.htm"
        );
        assert_eq!(e.title, "N-1A - Roundhill ETF Trust  (CIK 0001976517)");
        assert_eq!(e.form_type.as_deref(), Some("N-1A"));
        assert_eq!(e.updated.as_deref(), Some("2025-01-14"));
        assert_eq!(e.summary.as_deref(), Some("Roundhill Humanoid Robotics ETF"));
    }

    #[test]
    fn falls_back_to_index_page_without_file_name() {
        let body = r#"{"hits":{"hits":[{"_id":"0001-25-9","_source":{
            "display_names":["Acme Funds"],"adsh":"0001-25-9","ciks":["42"]}}]}}"#;
        let entries = parse_search_results(body).unwrap();
        assert_eq!(
            entries[0].link,
            "https://www.sec.gov/Archives/edgar/data/42/0001259/0001-25-9-index.htm"
        );
        assert_eq!(entries[0].title, "Acme Funds");
        assert!(entries[0].form_type.is_none());
    }

    #[test]
    fn empty_envelope_yields_no_entries() {
        assert!(parse_search_results("{}").unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse_search_results("<html>").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }
}
