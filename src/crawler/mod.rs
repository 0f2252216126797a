//! Crawler module for the two-stage crawl pipeline
//!
//! This module contains the core crawling logic, including:
//! - Work queues with drain-with-timeout semantics
//! - Fixed-size worker pools with cooperative shutdown
//! - The discovery and content stages
//! - The `Fetcher` and `Parser` capabilities and their default implementations
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod pool;
mod queue;
mod stages;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use parser::{HtmlParser, Parser};
pub use pool::{Stage, WorkerPool};
pub use queue::{Dequeued, WorkQueue};
pub use stages::{ContentStage, ContentTask, DiscoveryStage, DiscoveryTask};

use crate::config::Config;
use crate::SpiderError;

/// Runs a complete crawl for `query`
///
/// This is the main entry point. It will:
/// 1. Seed one discovery task per configured search engine
/// 2. Fetch results pages and collect candidate links
/// 3. Fetch candidate pages and extract their text, up to `max_results`
/// 4. Return the corpus together with fetch/processing counts
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The crawl ran; the corpus may be empty
/// * `Err(SpiderError)` - No search engine was configured, or the HTTP client failed to build
pub async fn crawl(
    config: &Config,
    query: &str,
    max_results: usize,
) -> Result<CrawlOutcome, SpiderError> {
    run_crawl(config, query, max_results).await
}
