//! Markdown report generation
//!
//! This module generates a human-readable markdown report of a crawl,
//! including timing, counts, drain outcomes, and a per-document listing.

use crate::output::traits::{CrawlReport, OutputHandler, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Characters of text shown per document in the listing
const EXCERPT_CHARS: usize = 160;

/// Writes the markdown report to a fixed path
#[derive(Debug, Clone)]
pub struct MarkdownReport {
    path: PathBuf,
}

impl MarkdownReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for MarkdownReport {
    fn write(&self, report: &CrawlReport) -> OutputResult<String> {
        generate_markdown_report(report, &self.path)?;
        Ok(format!("Report written to {}", self.path.display()))
    }
}

/// Generates a markdown report and writes it to `output_path`
pub fn generate_markdown_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Topic-Spider Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Query**: {}\n", report.query));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        report.duration_seconds()
    ));
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Counts
    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Result Limit | {} |\n", report.max_results));
    md.push_str(&format!("| URLs Fetched | {} |\n", report.fetched_count));
    md.push_str(&format!("| URLs Processed | {} |\n", report.processed_count));
    md.push_str(&format!("| Documents | {} |\n", report.corpus.len()));
    md.push_str(&format!("| Words | {} |\n", report.total_words()));
    md.push_str(&format!("| Yield | {:.1}% |\n\n", report.yield_rate()));

    // Drain outcomes
    md.push_str("## Stage Completion\n\n");
    md.push_str(&format!(
        "- **Discovery**: {}\n",
        drain_label(report.discovery_drained)
    ));
    md.push_str(&format!(
        "- **Content**: {}\n\n",
        drain_label(report.content_drained)
    ));
    if report.is_partial() {
        md.push_str("> At least one stage timed out; the corpus is partial.\n\n");
    }

    // Documents
    if !report.corpus.is_empty() {
        md.push_str("## Documents\n\n");
        md.push_str("| # | URL | Characters | Excerpt |\n");
        md.push_str("|---|-----|------------|---------|\n");

        for (i, entry) in report.corpus.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                i + 1,
                entry.url,
                entry.text.chars().count(),
                excerpt(&entry.text)
            ));
        }
        md.push('\n');
    }

    md
}

fn drain_label(drained: bool) -> &'static str {
    if drained {
        "completed"
    } else {
        "timed out"
    }
}

/// Shortens text for a table cell without splitting a character
fn excerpt(text: &str) -> String {
    let flattened = text.replace(|c: char| c == '\n' || c == '\r', " ").replace('|', "\\|");
    match flattened.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}…", &flattened[..cut]),
        None => flattened,
    }
}
