//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns both queues, the dedup tracker, and the corpus for a
//! single crawl, and walks the phases in order:
//!
//! `Seeding → Discovering → DrainingDiscovery → ContentCrawling → DrainingContent → Done`
//!
//! Drain timeouts are logged and the crawl moves on with whatever has been
//! collected. Only an empty engine list aborts a crawl.

use crate::config::{Config, CrawlerConfig, SearchEngineEntry};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::parser::{HtmlParser, Parser};
use crate::crawler::pool::WorkerPool;
use crate::crawler::queue::WorkQueue;
use crate::crawler::stages::{ContentStage, ContentTask, DiscoveryStage, DiscoveryTask};
use crate::engine::discovery_url;
use crate::state::{Corpus, CorpusEntry, CrawlPhase, CrawlState};
use crate::SpiderError;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a finished crawl hands back to its caller
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// The query the crawl was run for
    pub query: String,

    /// Distinct URLs (results pages and content pages) whose fetch was attempted to completion
    pub fetched_count: usize,

    /// Content URLs admitted toward the result limit
    pub processed_count: usize,

    /// Extracted texts, in completion order
    pub corpus: Vec<CorpusEntry>,

    /// Whether the discovery queue emptied before its drain timeout
    pub discovery_drained: bool,

    /// Whether the content queue emptied before its drain timeout
    pub content_drained: bool,

    /// Wall-clock time from seeding to done
    pub elapsed: Duration,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    settings: CrawlerConfig,
    engines: Vec<SearchEngineEntry>,
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn Parser>,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP and parses with `scraper`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(SpiderError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, SpiderError> {
        let fetcher = HttpFetcher::new(&config.user_agent)?;

        Ok(Self::with_collaborators(
            config.crawler.clone(),
            config.search_engines.clone(),
            Arc::new(fetcher),
            Arc::new(HtmlParser),
        ))
    }

    /// Creates a coordinator with explicit fetch and parse capabilities
    pub fn with_collaborators(
        settings: CrawlerConfig,
        engines: Vec<SearchEngineEntry>,
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn Parser>,
    ) -> Self {
        Self {
            settings,
            engines,
            fetcher,
            parser,
            phase: CrawlPhase::Seeding,
        }
    }

    /// The phase the most recent crawl reached
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Builds one discovery task per usable engine
    ///
    /// Engines whose template cannot be rendered are skipped with a warning.
    pub fn discovery_tasks(&self, query: &str) -> Vec<DiscoveryTask> {
        self.engines
            .iter()
            .filter_map(|entry| match discovery_url(entry, query) {
                Ok((engine, url)) => Some(DiscoveryTask { engine, url }),
                Err(e) => {
                    tracing::warn!("Skipping search engine: {}", e);
                    None
                }
            })
            .collect()
    }

    fn advance(&mut self, to: CrawlPhase) {
        debug_assert!(self.phase.can_transition_to(to));
        tracing::debug!("Crawl phase: {} -> {}", self.phase, to);
        self.phase = to;
    }

    /// Runs one complete crawl
    ///
    /// # Arguments
    ///
    /// * `query` - The search query, unencoded
    /// * `max_results` - Upper bound on content URLs processed
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - Always, unless seeding produced no work
    /// * `Err(SpiderError::NoSearchEnginesConfigured)` - No usable search engine
    pub async fn crawl(
        &mut self,
        query: &str,
        max_results: usize,
    ) -> Result<CrawlOutcome, SpiderError> {
        let started = Instant::now();
        self.phase = CrawlPhase::Seeding;

        let tasks = self.discovery_tasks(query);
        if tasks.is_empty() {
            return Err(SpiderError::NoSearchEnginesConfigured);
        }

        tracing::info!(
            "Crawling '{}' across {} search engine(s), limit {}",
            query,
            tasks.len(),
            max_results
        );

        let state = Arc::new(CrawlState::new(max_results));
        let corpus = Arc::new(Corpus::new());
        let discovery_queue = WorkQueue::<DiscoveryTask>::new("discovery");
        let content_queue = WorkQueue::<ContentTask>::new("content");

        for task in tasks {
            discovery_queue.enqueue(task);
        }

        self.advance(CrawlPhase::Discovering);
        let discovery_pool = WorkerPool::spawn(
            self.settings.discovery_workers as usize,
            discovery_queue.clone(),
            Arc::new(DiscoveryStage::new(
                Arc::clone(&self.fetcher),
                Arc::clone(&self.parser),
                Arc::clone(&state),
                content_queue.clone(),
                self.settings.discovery_fetch_timeout(),
            )),
        );

        self.advance(CrawlPhase::DrainingDiscovery);
        let discovery_drained =
            drain_stage(&discovery_queue, self.settings.discovery_drain_timeout()).await;

        self.advance(CrawlPhase::ContentCrawling);
        tracing::info!(
            "Discovery finished: {} candidate link(s) queued",
            content_queue.outstanding()
        );
        let content_pool = WorkerPool::spawn(
            self.settings.content_workers as usize,
            content_queue.clone(),
            Arc::new(ContentStage::new(
                Arc::clone(&self.fetcher),
                Arc::clone(&self.parser),
                Arc::clone(&state),
                Arc::clone(&corpus),
                self.settings.content_fetch_timeout(),
            )),
        );

        self.advance(CrawlPhase::DrainingContent);
        let content_drained =
            drain_stage(&content_queue, self.settings.content_drain_timeout()).await;

        discovery_pool.stop();
        content_pool.stop();
        self.advance(CrawlPhase::Done);

        let outcome = CrawlOutcome {
            query: query.to_string(),
            fetched_count: state.fetched_count(),
            processed_count: state.processed_count(),
            corpus: corpus.snapshot(),
            discovery_drained,
            content_drained,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "Scraped {} URLs in {:.1} seconds ({} corpus entries)",
            outcome.fetched_count,
            outcome.elapsed.as_secs_f64(),
            outcome.corpus.len()
        );

        Ok(outcome)
    }
}

/// Waits for a queue to drain; a timeout is logged, never fatal
async fn drain_stage<T>(queue: &WorkQueue<T>, timeout: Duration) -> bool {
    match queue.drain(timeout).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("{} queue: {}; continuing with partial results", queue.name(), e);
            false
        }
    }
}

/// Runs a crawl with the HTTP fetcher and HTML parser
///
/// # Example
///
/// ```no_run
/// use topic_spider::config::load_config;
/// use topic_spider::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let outcome = run_crawl(&config, "rust web crawler", 50).await?;
/// println!("{} documents", outcome.corpus.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    query: &str,
    max_results: usize,
) -> Result<CrawlOutcome, SpiderError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.crawl(query, max_results).await
}
