//! HTTP fetcher implementation
//!
//! This module handles all network retrieval for the crawler:
//! - The `Fetcher` capability the crawl stages depend on
//! - Building an HTTP client with the configured user agent
//! - Per-request timeouts and error classification
//!
//! Fetches are never retried; a failed fetch only costs the crawl one page.

use crate::config::UserAgentConfig;
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Retrieves the body of a URL within a deadline
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchResult<String>;
}

/// Builds an HTTP client with proper configuration
///
/// The user agent is formatted as `Name/Version (+ContactURL; ContactEmail)`.
///
/// # Example
///
/// ```no_run
/// use topic_spider::config::UserAgentConfig;
/// use topic_spider::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "TopicSpider".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL and returns its body as text
    ///
    /// # Error classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Deadline exceeded | `FetchError::Timeout` |
    /// | Connection/DNS/TLS failure | `FetchError::Network` |
    /// | Non-2xx status | `FetchError::Status` |
    /// | Body could not be read | `FetchError::Body` |
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchResult<String> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

/// Maps a transport error onto the fetch error taxonomy
fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
