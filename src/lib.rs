//! Topic-Spider: a search-driven corpus collector
//!
//! This crate discovers content URLs from search-engine result pages for a
//! query, fetches each discovered page, extracts its plain text, and returns
//! the resulting corpus for downstream analysis.

pub mod config;
pub mod crawler;
pub mod engine;
pub mod output;
pub mod state;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Topic-Spider operations
///
/// Only configuration problems and an empty engine list abort a crawl.
/// Per-URL failures are absorbed inside the crawl stages.
#[derive(Debug, Error)]
pub enum SpiderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No search engines configured")]
    NoSearchEnginesConfigured,

    #[error("Invalid query template for {engine}: {message}")]
    InvalidQueryTemplate { engine: String, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failures of a single fetch
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// Failures while extracting links or text from HTML
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Malformed document: {0}")]
    Document(String),
}

/// Work queue errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Drain timed out after {timeout:?} with {outstanding} task(s) outstanding")]
    DrainTimeout {
        timeout: Duration,
        outstanding: usize,
    },

    #[error("Task marked done more times than tasks were enqueued")]
    TooManyCompletions,
}

/// Result type alias for Topic-Spider operations
pub type Result<T> = std::result::Result<T, SpiderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, CrawlOutcome};
pub use engine::SearchEngine;
pub use state::{CorpusEntry, CrawlPhase};
