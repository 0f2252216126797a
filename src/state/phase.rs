/// Coordinator phase definitions
///
/// A crawl walks these phases strictly in order, exactly once.
use std::fmt;

/// Represents the current phase of a crawl invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrawlPhase {
    /// One discovery task is being enqueued per configured engine
    Seeding,

    /// The discovery pool has been started
    Discovering,

    /// Waiting for the discovery queue to empty
    DrainingDiscovery,

    /// The content pool has been started
    ContentCrawling,

    /// Waiting for the content queue to empty
    DrainingContent,

    /// The corpus has been handed back to the caller
    Done,
}

impl CrawlPhase {
    /// Returns the phase that follows this one, or `None` once done
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Seeding => Some(Self::Discovering),
            Self::Discovering => Some(Self::DrainingDiscovery),
            Self::DrainingDiscovery => Some(Self::ContentCrawling),
            Self::ContentCrawling => Some(Self::DrainingContent),
            Self::DrainingContent => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns true if `to` is the only legal successor of this phase
    pub fn can_transition_to(&self, to: Self) -> bool {
        self.next() == Some(to)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while the coordinator is blocked on a queue drain
    pub fn is_draining(&self) -> bool {
        matches!(self, Self::DrainingDiscovery | Self::DrainingContent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Discovering => "discovering",
            Self::DrainingDiscovery => "draining_discovery",
            Self::ContentCrawling => "content_crawling",
            Self::DrainingContent => "draining_content",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
