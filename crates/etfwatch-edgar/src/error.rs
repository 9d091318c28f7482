use thiserror::Error;

/// Errors returned by [`crate::EdgarClient`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Connection, TLS, or body-read failure.
    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    NonSuccessStatus { status: u16, url: String },

    /// The underlying `reqwest::Client` could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Errors returned by [`crate::parse_feed`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single source's failure during collection. Never fatal to a cycle.
#[derive(Debug, Error)]
pub enum EdgarError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
