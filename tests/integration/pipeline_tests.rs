//! Pipeline properties checked with in-memory fetch and parse doubles
//!
//! No network is involved: results pages are newline-separated link lists
//! and a content page's text is its body.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use topic_spider::config::{CrawlerConfig, SearchEngineEntry};
use topic_spider::crawler::{Coordinator, Fetcher, Parser};
use topic_spider::{CrawlPhase, FetchError, FetchResult, ParseError, SearchEngine, SpiderError};

const RESULTS_URL: &str = "https://search.test/?q=rust";

/// Serves fixed bodies; anything else is a 404
struct MapFetcher {
    pages: HashMap<String, String>,
    delay: Duration,
    stalled: Vec<String>,
    calls: AtomicUsize,
}

impl MapFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
            delay: Duration::ZERO,
            stalled: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes fetches of `url` hang far beyond any test timeout
    fn with_stalled(mut self, url: &str) -> Self {
        self.stalled.push(url.to_string());
        self
    }
}

#[async_trait]
impl Fetcher for MapFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> FetchResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.stalled.iter().any(|stalled| stalled == url) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }

        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

struct FailingFetcher;

#[async_trait]
impl Fetcher for FailingFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> FetchResult<String> {
        Err(FetchError::Network {
            url: url.to_string(),
            message: "connection refused".to_string(),
        })
    }
}

struct LineParser;

impl Parser for LineParser {
    fn extract_links(&self, _engine: SearchEngine, html: &str) -> Result<Vec<String>, ParseError> {
        Ok(html.lines().map(str::trim).map(String::from).collect())
    }

    fn extract_text(&self, html: &str) -> Result<String, ParseError> {
        Ok(html.trim().to_string())
    }
}

fn settings() -> CrawlerConfig {
    CrawlerConfig {
        discovery_workers: 2,
        content_workers: 4,
        discovery_drain_timeout: 5_000,
        content_drain_timeout: 5_000,
        ..CrawlerConfig::default()
    }
}

fn engine(url: &str) -> SearchEngineEntry {
    SearchEngineEntry {
        engine: Some(SearchEngine::Google),
        url: url.to_string(),
    }
}

fn coordinator(settings: CrawlerConfig, fetcher: Arc<dyn Fetcher>) -> Coordinator {
    Coordinator::with_collaborators(
        settings,
        vec![engine("https://search.test/?q={query}")],
        fetcher,
        Arc::new(LineParser),
    )
}

fn site() -> MapFetcher {
    MapFetcher::new(&[
        (
            RESULTS_URL,
            "https://a.com\nhttps://b.com\nhttps://a.com\nhttps://c.com",
        ),
        ("https://a.com", "alpha"),
        ("https://b.com", "beta"),
        ("https://c.com", "gamma"),
    ])
}

fn sorted_urls(outcome: &topic_spider::CrawlOutcome) -> Vec<String> {
    let mut urls: Vec<_> = outcome.corpus.iter().map(|e| e.url.clone()).collect();
    urls.sort();
    urls
}

#[tokio::test]
async fn test_duplicate_links_are_processed_once() {
    let fetcher = Arc::new(site());
    let mut coordinator = coordinator(settings(), fetcher.clone());

    let outcome = coordinator.crawl("rust", 10).await.unwrap();

    assert_eq!(
        sorted_urls(&outcome),
        vec!["https://a.com", "https://b.com", "https://c.com"]
    );
    assert_eq!(outcome.processed_count, 3);
    assert_eq!(outcome.fetched_count, 4);
    // One results page plus three distinct content pages
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
    assert_eq!(coordinator.phase(), CrawlPhase::Done);
}

#[tokio::test]
async fn test_result_limit_caps_processing() {
    let fetcher = Arc::new(site());
    let mut coordinator = coordinator(settings(), fetcher.clone());

    let outcome = coordinator.crawl("rust", 1).await.unwrap();

    assert_eq!(outcome.corpus.len(), 1);
    assert_eq!(outcome.processed_count, 1);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_zero_limit_collects_nothing() {
    let fetcher = Arc::new(site());
    let mut coordinator = coordinator(settings(), fetcher.clone());

    let outcome = coordinator.crawl("rust", 0).await.unwrap();

    assert!(outcome.corpus.is_empty());
    assert_eq!(outcome.processed_count, 0);
    // The results page is still fetched
    assert_eq!(outcome.fetched_count, 1);
}

#[tokio::test]
async fn test_failing_fetches_yield_empty_corpus() {
    let mut coordinator = coordinator(settings(), Arc::new(FailingFetcher));

    let outcome = coordinator.crawl("rust", 10).await.unwrap();

    assert!(outcome.corpus.is_empty());
    assert_eq!(outcome.fetched_count, 0);
    assert_eq!(outcome.processed_count, 0);
    assert!(outcome.discovery_drained);
    assert!(outcome.content_drained);
}

#[tokio::test]
async fn test_missing_pages_count_as_processed() {
    let fetcher = MapFetcher::new(&[
        (RESULTS_URL, "https://a.com\nhttps://gone.com"),
        ("https://a.com", "alpha"),
    ]);
    let mut coordinator = coordinator(settings(), Arc::new(fetcher));

    let outcome = coordinator.crawl("rust", 10).await.unwrap();

    assert_eq!(sorted_urls(&outcome), vec!["https://a.com"]);
    assert_eq!(outcome.processed_count, 2);
    assert_eq!(outcome.fetched_count, 3);
}

#[tokio::test]
async fn test_empty_pages_are_not_collected() {
    let fetcher = MapFetcher::new(&[
        (RESULTS_URL, "https://a.com\nhttps://blank.com"),
        ("https://a.com", "alpha"),
        ("https://blank.com", "   "),
    ]);
    let mut coordinator = coordinator(settings(), Arc::new(fetcher));

    let outcome = coordinator.crawl("rust", 10).await.unwrap();

    assert_eq!(sorted_urls(&outcome), vec!["https://a.com"]);
    assert_eq!(outcome.processed_count, 2);
}

#[tokio::test]
async fn test_engines_sharing_links_fetch_each_page_once() {
    let fetcher = Arc::new(MapFetcher::new(&[
        ("https://one.test/?q=rust", "https://a.com\nhttps://b.com"),
        ("https://two.test/?q=rust", "https://b.com\nhttps://a.com"),
        ("https://a.com", "alpha"),
        ("https://b.com", "beta"),
    ]));
    let mut coordinator = Coordinator::with_collaborators(
        settings(),
        vec![
            engine("https://one.test/?q={query}"),
            engine("https://two.test/?q={query}"),
        ],
        fetcher.clone(),
        Arc::new(LineParser),
    );

    let outcome = coordinator.crawl("rust", 10).await.unwrap();

    assert_eq!(sorted_urls(&outcome), vec!["https://a.com", "https://b.com"]);
    assert_eq!(outcome.fetched_count, 4);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_no_engines_is_an_error() {
    let mut coordinator =
        Coordinator::with_collaborators(settings(), vec![], Arc::new(site()), Arc::new(LineParser));

    let result = coordinator.crawl("rust", 10).await;
    assert!(matches!(result, Err(SpiderError::NoSearchEnginesConfigured)));
}

#[tokio::test]
async fn test_only_unusable_engines_is_an_error() {
    let mut coordinator = Coordinator::with_collaborators(
        settings(),
        vec![engine("https://search.test/no-placeholder")],
        Arc::new(site()),
        Arc::new(LineParser),
    );

    let result = coordinator.crawl("rust", 10).await;
    assert!(matches!(result, Err(SpiderError::NoSearchEnginesConfigured)));
}

#[tokio::test]
async fn test_stalled_fetches_do_not_block_past_drain_timeouts() {
    let fetcher = site().with_delay(Duration::from_secs(30));
    let stalled = CrawlerConfig {
        discovery_drain_timeout: 200,
        content_drain_timeout: 200,
        ..settings()
    };
    let mut coordinator = coordinator(stalled, Arc::new(fetcher));

    let started = Instant::now();
    let outcome = coordinator.crawl("rust", 10).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!outcome.discovery_drained);
    assert!(outcome.corpus.is_empty());
    assert_eq!(coordinator.phase(), CrawlPhase::Done);
}

#[tokio::test]
async fn test_stalled_content_page_leaves_partial_corpus() {
    let fetcher = MapFetcher::new(&[
        (RESULTS_URL, "https://a.com\nhttps://slow.com"),
        ("https://a.com", "alpha"),
        ("https://slow.com", "never seen"),
    ])
    .with_stalled("https://slow.com");
    let stalled = CrawlerConfig {
        content_drain_timeout: 300,
        ..settings()
    };
    let mut coordinator = coordinator(stalled, Arc::new(fetcher));

    let started = Instant::now();
    let outcome = coordinator.crawl("rust", 10).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(outcome.discovery_drained);
    assert!(!outcome.content_drained);
    assert_eq!(sorted_urls(&outcome), vec!["https://a.com"]);
    // The stalled page was admitted before its fetch, so it still counts
    assert_eq!(outcome.processed_count, 2);
    assert_eq!(outcome.fetched_count, 2);
    assert_eq!(coordinator.phase(), CrawlPhase::Done);
}

#[tokio::test]
async fn test_slow_pages_drain_before_timeout() {
    let mut pages = vec![(RESULTS_URL.to_string(), String::new())];
    let links: Vec<String> = (0..40).map(|i| format!("https://site{}.com", i)).collect();
    pages[0].1 = links.join("\n");
    pages.extend(links.iter().map(|url| (url.clone(), format!("text of {}", url))));

    let borrowed: Vec<(&str, &str)> = pages
        .iter()
        .map(|(url, body)| (url.as_str(), body.as_str()))
        .collect();
    let fetcher = MapFetcher::new(&borrowed).with_delay(Duration::from_millis(10));
    let mut coordinator = coordinator(settings(), Arc::new(fetcher));

    let outcome = coordinator.crawl("rust", 100).await.unwrap();

    assert!(outcome.discovery_drained);
    assert!(outcome.content_drained);
    assert_eq!(outcome.corpus.len(), 40);
    assert_eq!(outcome.processed_count, 40);
}
