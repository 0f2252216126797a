//! Output module for crawl reports and corpus export
//!
//! This module handles:
//! - Generating a markdown report of a crawl
//! - Exporting the corpus as JSON for downstream topic modeling
//! - Printing crawl statistics to the console

mod json;
mod markdown;
pub mod stats;
mod traits;

pub use json::{read_corpus_json, write_corpus_json, JsonCorpus};
pub use markdown::{format_markdown_report, generate_markdown_report, MarkdownReport};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{CrawlReport, OutputError, OutputHandler, OutputResult};

use crate::config::OutputConfig;

/// Builds the output handlers requested by configuration
///
/// `report_path` and `corpus_path` override the configured paths.
pub fn handlers(
    config: &OutputConfig,
    report_path: Option<&str>,
    corpus_path: Option<&str>,
) -> Vec<Box<dyn OutputHandler>> {
    let mut handlers: Vec<Box<dyn OutputHandler>> = Vec::new();

    if let Some(path) = report_path.or(config.report_path.as_deref()) {
        handlers.push(Box::new(MarkdownReport::new(path)));
    }
    if let Some(path) = corpus_path.or(config.corpus_path.as_deref()) {
        handlers.push(Box::new(JsonCorpus::new(path)));
    }

    handlers
}

/// Runs every handler against the report, stopping at the first failure
///
/// Returns each handler's description of what it wrote.
pub fn write_outputs(
    handlers: &[Box<dyn OutputHandler>],
    report: &CrawlReport,
) -> crate::Result<Vec<String>> {
    let mut written = Vec::with_capacity(handlers.len());
    for handler in handlers {
        written.push(handler.write(report)?);
    }
    Ok(written)
}
