//! HTTP client for the remote catalog
//!
//! One `reqwest::Client` is built per run and shared by every concurrent
//! request. Every failure mode is absorbed here and turned into a
//! [`FetchOutcome`]; nothing propagates to the traversal code.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::domain::services::{EmptyReason, FetchOutcome, JsonSource, Query};
use crate::error::CrawlError;
use crate::infrastructure::config::defaults;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            follow_redirects: true,
        }
    }
}

/// JSON fetcher over a pooled HTTP session
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: &HttpClientConfig) -> Result<Self, CrawlError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonSource for CatalogClient {
    async fn fetch_json(&self, url: &str, query: &Query) -> FetchOutcome {
        let response = match self.client.get(url).query(query).send().await {
            Ok(response) => response,
            Err(e) => return request_failure(url, &e),
        };

        let status = response.status();
        if let Some(reason) = classify_status(status) {
            if reason == EmptyReason::NotFound {
                debug!("404: {}", url);
            } else {
                warn!("⚠️ HTTP error {} for {}", status, url);
            }
            return FetchOutcome::Empty(reason);
        }

        match response.bytes().await {
            Ok(body) if body.trim_ascii().is_empty() => {
                debug!("Empty body ({}): {}", status, url);
                FetchOutcome::Empty(EmptyReason::NoContent)
            }
            Ok(body) => decode_body(url, &body),
            Err(e) => request_failure(url, &e),
        }
    }
}

/// `None` for success statuses, otherwise why the response carries no data
pub fn classify_status(status: StatusCode) -> Option<EmptyReason> {
    if status.is_success() {
        None
    } else if status == StatusCode::NOT_FOUND {
        Some(EmptyReason::NotFound)
    } else {
        Some(EmptyReason::Status(status.as_u16()))
    }
}

/// Parse a response body, logging undecodable payloads as errors
pub fn decode_body(url: &str, body: &[u8]) -> FetchOutcome {
    match serde_json::from_slice(body) {
        Ok(value) => FetchOutcome::Data(value),
        Err(e) => {
            error!("❌ Failed to decode JSON from {}: {}", url, e);
            FetchOutcome::Malformed(e.to_string())
        }
    }
}

fn request_failure(url: &str, e: &reqwest::Error) -> FetchOutcome {
    if e.is_timeout() {
        warn!("⏱️ Request timed out: {}", url);
        FetchOutcome::Empty(EmptyReason::Timeout)
    } else {
        warn!("⚠️ Request failed for {}: {}", url, e);
        FetchOutcome::Empty(EmptyReason::Transport)
    }
}
