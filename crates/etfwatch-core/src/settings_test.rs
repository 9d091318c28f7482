use super::*;

#[test]
fn defaults_match_documented_values() {
    let settings = ReportSettings::default();
    assert!(settings.is_allowed_form_type("N-1A"));
    assert!(settings.is_allowed_form_type("n-1a"));
    assert!(settings.is_excluded_form_type("485BPOS"));
    assert!(settings.rejects_amendment_suffix("S-1"));
    assert!(settings.require_allowed_form_type);
    assert_eq!(settings.min_name_length, 5);
    assert_eq!(settings.max_name_length, 100);
    assert_eq!(settings.display_name_length, 60);
    assert_eq!(settings.max_listed_filings, 10);
    assert_eq!(settings.local_timezone_offset.local_minus_utc(), 9 * 3600);
    assert_eq!(settings.source_timezone_offset.local_minus_utc(), -5 * 3600);
}

#[test]
fn empty_file_yields_defaults_with_one_source_per_allowed_form() {
    let file = parse_report_file("{}").unwrap();
    assert_eq!(file.settings, ReportSettings::default());
    assert_eq!(file.sources.len(), 3);
    assert!(file
        .sources
        .iter()
        .all(|s| s.shape == ContentShape::Atom && s.url.contains("action=getcurrent")));
    assert!(file
        .sources
        .iter()
        .any(|s| s.form_type.as_deref() == Some("N-1A") && s.url.contains("type=N-1A")));
}

#[test]
fn partial_settings_keep_other_defaults() {
    let yaml = r#"
settings:
  allowed_form_types: ["N-1A"]
  max_name_length: 80
  local_timezone_offset: "+01:00"
"#;
    let file = parse_report_file(yaml).unwrap();
    assert_eq!(file.settings.allowed_form_types.len(), 1);
    assert_eq!(file.settings.max_name_length, 80);
    assert_eq!(file.settings.local_timezone_offset.local_minus_utc(), 3600);
    assert_eq!(file.settings.min_name_length, 5);
    assert_eq!(file.sources.len(), 1);
}

#[test]
fn explicit_sources_are_kept() {
    let yaml = r#"
sources:
  - name: efts
    url: https://efts.sec.gov/LATEST/search-index?q=%22exchange-traded%22&forms=N-1A
    shape: search_json
  - name: rss
    url: https://example.com/feed.xml
    shape: rss
    form_type: S-1
"#;
    let file = parse_report_file(yaml).unwrap();
    assert_eq!(file.sources.len(), 2);
    assert_eq!(file.sources[0].shape, ContentShape::SearchJson);
    assert_eq!(file.sources[1].form_type.as_deref(), Some("S-1"));
}

#[test]
fn duplicate_source_names_fail_validation() {
    let yaml = r#"
sources:
  - name: feed
    url: https://example.com/a
    shape: atom
  - name: FEED
    url: https://example.com/b
    shape: atom
"#;
    let err = parse_report_file(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate source name")));
}

#[test]
fn non_http_source_url_fails_validation() {
    let yaml = r#"
sources:
  - name: local
    url: file:///tmp/feed.xml
    shape: atom
"#;
    let err = parse_report_file(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn max_below_min_name_length_fails_validation() {
    let yaml = "settings:\n  min_name_length: 10\n  max_name_length: 5\n";
    let err = parse_report_file(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("max_name_length")));
}

#[test]
fn zero_listed_filings_fails_validation() {
    let yaml = "settings:\n  max_listed_filings: 0\n";
    let err = parse_report_file(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("max_listed_filings")));
}

#[test]
fn invalid_offset_fails_parse() {
    let yaml = "settings:\n  source_timezone_offset: \"+25:00\"\n";
    let err = parse_report_file(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::ReportFileParse(_)));
}

#[test]
fn oversized_offset_is_an_error_not_a_panic() {
    for raw in ["+999999", "-99999999", "+2147483647", "+14:59", "+-5"] {
        assert!(parse_utc_offset(raw).is_none(), "{raw} should be rejected");
    }
    let yaml = "settings:\n  source_timezone_offset: \"+999999\"\n";
    let err = parse_report_file(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::ReportFileParse(_)));
    assert!(parse_utc_offset("+14:00").is_some());
}

#[test]
fn unknown_shape_fails_parse() {
    let yaml = "sources:\n  - name: x\n    url: https://example.com\n    shape: json\n";
    assert!(matches!(
        parse_report_file(yaml),
        Err(ConfigError::ReportFileParse(_))
    ));
}

#[test]
fn parse_utc_offset_accepts_common_forms() {
    assert_eq!(parse_utc_offset("+09:00").unwrap().local_minus_utc(), 32_400);
    assert_eq!(parse_utc_offset("-0500").unwrap().local_minus_utc(), -18_000);
    assert_eq!(parse_utc_offset("+5:30").unwrap().local_minus_utc(), 19_800);
    assert_eq!(parse_utc_offset("-4").unwrap().local_minus_utc(), -14_400);
    assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
    assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
}

#[test]
fn parse_utc_offset_rejects_garbage() {
    assert!(parse_utc_offset("09:00").is_none());
    assert!(parse_utc_offset("+15:00").is_none());
    assert!(parse_utc_offset("+09:75").is_none());
    assert!(parse_utc_offset("").is_none());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let file =
        load_report_file_or_default(Path::new("/nonexistent/etfwatch/config.yaml")).unwrap();
    assert_eq!(file.sources.len(), 3);
}

#[test]
fn missing_file_is_an_error_for_strict_loader() {
    let err = load_report_file(Path::new("/nonexistent/etfwatch/config.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReportFileIo { .. }));
}

#[test]
fn settings_round_trip_offsets_as_strings() {
    let json = serde_json::to_value(ReportSettings::default()).unwrap();
    assert_eq!(json["local_timezone_offset"], "+09:00");
    assert_eq!(json["source_timezone_offset"], "-05:00");
}
