use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Outcome of asking to process a content URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The URL was recorded as processed and counts toward the quota
    Accepted,
    /// The URL has already been processed
    Duplicate,
    /// The processed-item quota is exhausted
    QuotaReached,
}

#[derive(Debug, Default)]
struct Tracker {
    fetching: HashSet<String>,
    fetched: HashSet<String>,
    processed: HashSet<String>,
}

/// Deduplication and quota tracking for one crawl
///
/// Every check-then-mutate happens under a single lock, so workers running
/// on different threads cannot both admit the same URL or overshoot the
/// quota. `processed_count` is the size of the `processed` set.
#[derive(Debug)]
pub struct CrawlState {
    tracker: Mutex<Tracker>,
    max_results: usize,
}

impl CrawlState {
    pub fn new(max_results: usize) -> Self {
        Self {
            tracker: Mutex::new(Tracker::default()),
            max_results,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tracker> {
        // Each update is a single insert, so a poisoned tracker is still consistent
        self.tracker.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claims a discovery URL for fetching
    ///
    /// Returns false if the URL was already claimed.
    pub fn begin_fetching(&self, url: &str) -> bool {
        self.lock().fetching.insert(url.to_string())
    }

    /// Records that a fetch of `url` was attempted to completion
    pub fn mark_fetched(&self, url: &str) {
        self.lock().fetched.insert(url.to_string());
    }

    /// Atomically checks dedup and quota, then admits the URL
    pub fn try_accept(&self, url: &str) -> Admission {
        let mut tracker = self.lock();

        if tracker.processed.contains(url) {
            return Admission::Duplicate;
        }
        if tracker.processed.len() >= self.max_results {
            return Admission::QuotaReached;
        }

        tracker.processed.insert(url.to_string());
        Admission::Accepted
    }

    #[cfg(test)]
    pub(crate) fn is_fetched(&self, url: &str) -> bool {
        self.lock().fetched.contains(url)
    }

    pub fn fetched_count(&self) -> usize {
        self.lock().fetched.len()
    }

    pub fn processed_count(&self) -> usize {
        self.lock().processed.len()
    }
}
