//! Discovery and content stages
//!
//! Discovery turns one search-engine results page into content tasks.
//! Content turns one candidate page into at most one corpus entry. Both
//! absorb every fetch and parse failure: the task yields nothing and the
//! worker moves on.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::Parser;
use crate::crawler::pool::Stage;
use crate::crawler::queue::WorkQueue;
use crate::engine::SearchEngine;
use crate::state::{Admission, Corpus, CorpusEntry, CrawlState};
use crate::url::is_absolute_http;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A pending fetch of one search-engine results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryTask {
    pub engine: SearchEngine,
    pub url: String,
}

/// A pending fetch of one candidate content URL
pub type ContentTask = String;

/// Fetches results pages and feeds their links to the content queue
pub struct DiscoveryStage {
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn Parser>,
    state: Arc<CrawlState>,
    content_queue: WorkQueue<ContentTask>,
    fetch_timeout: Duration,
}

impl DiscoveryStage {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn Parser>,
        state: Arc<CrawlState>,
        content_queue: WorkQueue<ContentTask>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            parser,
            state,
            content_queue,
            fetch_timeout,
        }
    }
}

#[async_trait]
impl Stage<DiscoveryTask> for DiscoveryStage {
    async fn process(&self, task: &DiscoveryTask) {
        if !self.state.begin_fetching(&task.url) {
            tracing::debug!("Skipping {}: already being fetched", task.url);
            return;
        }

        let html = match self.fetcher.fetch(&task.url, self.fetch_timeout).await {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("Discovery fetch failed ({}): {}", task.engine, e);
                return;
            }
        };

        let links = self
            .parser
            .extract_links(task.engine, &html)
            .unwrap_or_else(|e| {
                tracing::debug!("Failed to parse {} results: {}", task.engine, e);
                Vec::new()
            });

        self.state.mark_fetched(&task.url);

        let mut queued = 0;
        for link in links.into_iter().filter(|link| is_absolute_http(link)) {
            self.content_queue.enqueue(link);
            queued += 1;
        }

        tracing::debug!("{} link(s) queued from {}", queued, task.engine);
    }
}

/// Fetches candidate pages and appends their text to the corpus
pub struct ContentStage {
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn Parser>,
    state: Arc<CrawlState>,
    corpus: Arc<Corpus>,
    fetch_timeout: Duration,
}

impl ContentStage {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn Parser>,
        state: Arc<CrawlState>,
        corpus: Arc<Corpus>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            parser,
            state,
            corpus,
            fetch_timeout,
        }
    }

    async fn fetch_text(&self, url: &str) -> Option<String> {
        let html = match self.fetcher.fetch(url, self.fetch_timeout).await {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("Content fetch failed: {}", e);
                return None;
            }
        };

        match self.parser.extract_text(&html) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("Failed to extract text from {}: {}", url, e);
                None
            }
        }
    }
}

#[async_trait]
impl Stage<ContentTask> for ContentStage {
    async fn process(&self, url: &ContentTask) {
        match self.state.try_accept(url) {
            Admission::Accepted => {}
            Admission::Duplicate => {
                tracing::trace!("Skipping {}: already processed", url);
                return;
            }
            Admission::QuotaReached => {
                tracing::trace!("Skipping {}: result limit reached", url);
                return;
            }
        }

        let text = self.fetch_text(url).await;

        // Attempted pages count as fetched even when they fail, keeping processed ⊆ fetched
        self.state.mark_fetched(url);

        match text {
            Some(text) if !text.is_empty() => {
                self.corpus.push(CorpusEntry::new(url.as_str(), text));
            }
            Some(_) => tracing::debug!("No text found at {}", url),
            None => {}
        }
    }
}
