//! End-to-end collection across several mocked sources.

use etfwatch_core::{ContentShape, FeedSource, ReportSettings};
use etfwatch_edgar::{collect_filings, EdgarClient, EdgarError, FetchError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const N1A_FEED: &str = r#"<?xml version="1.0" encoding="ISO-8859-1" ?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Latest Filings</title>
  <entry>
    <title>N-1A - Roundhill ETF Trust (0001976517) (Filer)</title>
    <link rel="alternate" type="text/html" href="https://www.sec.gov/Archives/edgar/data/1976517/000110465925003456/0001104659-25-003456-index.htm"/>
    <summary type="html"> &lt;b&gt;Filed:&lt;/b&gt; 2025-01-13 &lt;b&gt;AccNo:&lt;/b&gt; 0001104659-25-003456</summary>
    <updated>2025-01-13T17:02:11-05:00</updated>
    <category scheme="https://www.sec.gov/" label="form type" term="N-1A"/>
  </entry>
  <entry>
    <title>497K - Vanguard Index Funds ETF Shares (0000036405) (Filer)</title>
    <link rel="alternate" type="text/html" href="https://www.sec.gov/Archives/edgar/data/36405/000168386325000100/0001683863-25-000100-index.htm"/>
    <updated>2025-01-13T16:00:00-05:00</updated>
    <category scheme="https://www.sec.gov/" label="form type" term="497K"/>
  </entry>
</feed>"#;

const S1_FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>S-1 - Grayscale Solana Trust ETF (0001896677) (Filer)</title>
    <link rel="alternate" href="https://www.sec.gov/Archives/edgar/data/1896677/000119312525000111/0001193125-25-000111-index.htm"/>
    <updated>2025-01-14T09:30:00-05:00</updated>
    <category term="S-1"/>
  </entry>
  <entry>
    <title>N-1A - Roundhill ETF Trust (0001976517) (Filer)</title>
    <link rel="alternate" href="https://www.sec.gov/Archives/edgar/data/1976517/000110465925003456/0001104659-25-003456-index.htm"/>
    <updated>2025-01-13T17:02:11-05:00</updated>
    <category term="N-1A"/>
  </entry>
</feed>"#;

fn source(server: &MockServer, name: &str, route: &str, form: &str) -> FeedSource {
    FeedSource {
        name: name.to_string(),
        url: format!("{}{route}", server.uri()),
        shape: ContentShape::Atom,
        form_type: Some(form.to_string()),
    }
}

async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn collects_across_sources_and_skips_failures() {
    let server = MockServer::start().await;
    mount(&server, "/n1a", ResponseTemplate::new(200).set_body_string(N1A_FEED)).await;
    mount(&server, "/s1", ResponseTemplate::new(200).set_body_string(S1_FEED)).await;
    mount(&server, "/down", ResponseTemplate::new(503)).await;
    mount(
        &server,
        "/broken",
        ResponseTemplate::new(200).set_body_string("<feed><entry></wrong></feed>"),
    )
    .await;

    let sources = vec![
        source(&server, "n1a", "/n1a", "N-1A"),
        source(&server, "down", "/down", "N-1A"),
        source(&server, "s1", "/s1", "S-1"),
        source(&server, "broken", "/broken", "485APOS"),
    ];
    let client = EdgarClient::new("etfwatch-test/0.1 (ops@example.com)", 15).unwrap();
    let outcome = collect_filings(&client, &sources, &ReportSettings::default()).await;

    // Roundhill appears in two feeds but is reported once.
    assert_eq!(outcome.filings.len(), 2);
    assert_eq!(outcome.filings[0].name, "Grayscale Solana Trust ETF");
    assert_eq!(outcome.filings[0].form_type, "S-1");
    assert_eq!(outcome.filings[1].name, "Roundhill ETF Trust");
    assert_eq!(
        outcome.filings[1].filing_date,
        chrono::NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()
    );

    // The 497K entry is rejected, plus the duplicate is not a rejection.
    assert_eq!(outcome.rejected, 1);

    assert_eq!(outcome.failed_sources.len(), 2);
    assert_eq!(outcome.failed_sources[0].source_name, "down");
    assert!(matches!(
        outcome.failed_sources[0].error,
        EdgarError::Fetch(FetchError::NonSuccessStatus { status: 503, .. })
    ));
    assert_eq!(outcome.failed_sources[1].source_name, "broken");
    assert!(matches!(outcome.failed_sources[1].error, EdgarError::Parse(_)));
}

#[tokio::test]
async fn all_sources_empty_yields_no_filings() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/empty",
        ResponseTemplate::new(200).set_body_string(r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#),
    )
    .await;

    let sources = vec![source(&server, "empty", "/empty", "N-1A")];
    let client = EdgarClient::new("etfwatch-test/0.1 (ops@example.com)", 15).unwrap();
    let outcome = collect_filings(&client, &sources, &ReportSettings::default()).await;

    assert!(outcome.filings.is_empty());
    assert!(outcome.failed_sources.is_empty());
    assert_eq!(outcome.rejected, 0);
}
