//! HTTP fetcher for EDGAR feeds and search endpoints.
//!
//! Wraps `reqwest` with a fixed timeout and an operator-identifying
//! `User-Agent` (SEC fair-access policy rejects anonymous clients). Failures
//! are classified into [`FetchError`] variants; there are no retries.

use std::time::Duration;

use etfwatch_core::FeedSource;
use reqwest::Client;

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub url: String,
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    /// JSON payload; only sent for [`HttpMethod::Post`].
    pub json: Option<serde_json::Value>,
}

impl FetchRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            query: Vec::new(),
            json: None,
        }
    }

    #[must_use]
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            query: Vec::new(),
            json: Some(body),
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

impl From<&FeedSource> for FetchRequest {
    fn from(source: &FeedSource) -> Self {
        FetchRequest::get(source.url.clone())
    }
}

/// Status code and body of a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP client used for every source in a report cycle.
#[derive(Debug, Clone)]
pub struct EdgarClient {
    client: Client,
}

impl EdgarClient {
    /// Creates a client with the given `User-Agent` and per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Build`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Build)?;
        Ok(Self { client })
    }

    /// Sends `request` once and returns the response body on a 2xx status.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] when the call exceeds the client timeout.
    /// - [`FetchError::NonSuccessStatus`] on any non-2xx status.
    /// - [`FetchError::Network`] on connection or body-read failure.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let url = request.url.as_str();
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let (HttpMethod::Post, Some(body)) = (request.method, request.json.as_ref()) {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "non-success status from source");
            return Err(FetchError::NonSuccessStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        tracing::debug!(url, bytes = body.len(), "fetched source");
        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// Fetches a configured feed source with a plain GET.
    ///
    /// # Errors
    ///
    /// See [`EdgarClient::fetch`].
    pub async fn fetch_source(&self, source: &FeedSource) -> Result<FetchResponse, FetchError> {
        self.fetch(&FetchRequest::from(source)).await
    }
}

fn classify_send_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
