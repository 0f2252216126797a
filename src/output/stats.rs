//! Console statistics for a finished crawl

use crate::output::traits::CrawlReport;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    pub fetched: usize,
    pub processed: usize,
    pub documents: usize,
    pub words: usize,

    /// Documents per host, for a quick view of source diversity
    pub documents_by_host: BTreeMap<String, usize>,

    pub partial: bool,
}

impl CrawlStatistics {
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut documents_by_host = BTreeMap::new();
        for entry in &report.corpus {
            let host = url::Url::parse(&entry.url)
                .ok()
                .as_ref()
                .and_then(crate::url::extract_domain)
                .unwrap_or_else(|| "(unknown)".to_string());
            *documents_by_host.entry(host).or_insert(0) += 1;
        }

        Self {
            fetched: report.fetched_count,
            processed: report.processed_count,
            documents: report.corpus.len(),
            words: report.total_words(),
            documents_by_host,
            partial: report.is_partial(),
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  URLs fetched: {}", stats.fetched);
    println!("  URLs processed: {}", stats.processed);
    println!("  Documents collected: {}", stats.documents);
    println!("  Total words: {}", stats.words);
    println!();

    if !stats.documents_by_host.is_empty() {
        println!("Documents by Host:");
        let mut hosts: Vec<_> = stats.documents_by_host.iter().collect();
        hosts.sort_by(|a, b| b.1.cmp(a.1));

        for (host, count) in hosts {
            println!("  {}: {}", host, count);
        }
        println!();
    }

    if stats.partial {
        println!("Note: a stage timed out; results are partial.");
    }
}
