//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! report structure they consume.

use crate::crawler::CrawlOutcome;
use crate::state::CorpusEntry;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A finished crawl, with the metadata the reports need
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub query: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: Option<String>,
    pub max_results: usize,

    pub fetched_count: usize,
    pub processed_count: usize,
    pub discovery_drained: bool,
    pub content_drained: bool,

    pub corpus: Vec<CorpusEntry>,
}

impl CrawlReport {
    /// Builds a report for an outcome that finished just now
    pub fn from_outcome(
        outcome: CrawlOutcome,
        max_results: usize,
        config_hash: Option<String>,
    ) -> Self {
        let finished_at = Utc::now();
        let elapsed = chrono::Duration::from_std(outcome.elapsed)
            .unwrap_or_else(|_| chrono::Duration::zero());

        Self {
            query: outcome.query,
            started_at: finished_at - elapsed,
            finished_at,
            config_hash,
            max_results,
            fetched_count: outcome.fetched_count,
            processed_count: outcome.processed_count,
            discovery_drained: outcome.discovery_drained,
            content_drained: outcome.content_drained,
            corpus: outcome.corpus,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Percentage of processed URLs that produced a corpus entry
    pub fn yield_rate(&self) -> f64 {
        if self.processed_count == 0 {
            return 0.0;
        }
        (self.corpus.len() as f64 / self.processed_count as f64) * 100.0
    }

    /// Total whitespace-separated words across the corpus
    pub fn total_words(&self) -> usize {
        self.corpus
            .iter()
            .map(|entry| entry.text.split_whitespace().count())
            .sum()
    }

    /// True when either drain hit its timeout
    pub fn is_partial(&self) -> bool {
        !(self.discovery_drained && self.content_drained)
    }
}

/// Trait for output handlers
///
/// Output handlers turn a finished crawl into an artifact for people or for
/// downstream analysis.
pub trait OutputHandler {
    /// Writes the report; returns a short description of what was written
    fn write(&self, report: &CrawlReport) -> OutputResult<String>;
}
