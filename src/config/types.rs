use crate::engine::SearchEngine;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Topic-Spider
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(rename = "search-engine", default)]
    pub search_engines: Vec<SearchEngineEntry>,
}

/// Crawl pipeline tuning
///
/// All timeouts are in milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of workers fetching search-result pages
    #[serde(rename = "discovery-workers", default = "default_discovery_workers")]
    pub discovery_workers: u32,

    /// Number of workers fetching content pages
    #[serde(rename = "content-workers", default = "default_content_workers")]
    pub content_workers: u32,

    /// Per-request timeout for search-result pages
    #[serde(
        rename = "discovery-fetch-timeout",
        default = "default_discovery_fetch_timeout"
    )]
    pub discovery_fetch_timeout: u64,

    /// Per-request timeout for content pages
    #[serde(
        rename = "content-fetch-timeout",
        default = "default_content_fetch_timeout"
    )]
    pub content_fetch_timeout: u64,

    /// How long the coordinator waits for the discovery queue to empty
    #[serde(
        rename = "discovery-drain-timeout",
        default = "default_discovery_drain_timeout"
    )]
    pub discovery_drain_timeout: u64,

    /// How long the coordinator waits for the content queue to empty
    #[serde(
        rename = "content-drain-timeout",
        default = "default_content_drain_timeout"
    )]
    pub content_drain_timeout: u64,

    /// Result cap used when the caller does not supply one
    #[serde(rename = "max-results", default = "default_max_results")]
    pub max_results: usize,
}

impl CrawlerConfig {
    pub fn discovery_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_fetch_timeout)
    }

    pub fn content_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.content_fetch_timeout)
    }

    pub fn discovery_drain_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_drain_timeout)
    }

    pub fn content_drain_timeout(&self) -> Duration {
        Duration::from_millis(self.content_drain_timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            discovery_workers: default_discovery_workers(),
            content_workers: default_content_workers(),
            discovery_fetch_timeout: default_discovery_fetch_timeout(),
            content_fetch_timeout: default_content_fetch_timeout(),
            discovery_drain_timeout: default_discovery_drain_timeout(),
            content_drain_timeout: default_content_drain_timeout(),
            max_results: default_max_results(),
        }
    }
}

fn default_discovery_workers() -> u32 {
    2
}

fn default_content_workers() -> u32 {
    10
}

fn default_discovery_fetch_timeout() -> u64 {
    4_000
}

fn default_content_fetch_timeout() -> u64 {
    3_000
}

fn default_discovery_drain_timeout() -> u64 {
    120_000
}

fn default_content_drain_timeout() -> u64 {
    300_000
}

fn default_max_results() -> usize {
    100
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to the markdown crawl report
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,

    /// Path to the JSON corpus export
    #[serde(rename = "corpus-path")]
    pub corpus_path: Option<String>,
}

/// A search engine to seed discovery from
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEngineEntry {
    /// Engine identity; inferred from the template host when omitted
    #[serde(default)]
    pub engine: Option<SearchEngine>,

    /// Query URL template containing a `{query}` placeholder
    pub url: String,
}
