//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: The coordinator's linear state machine
//! - `CrawlState`: Deduplication sets and the processed-item quota
//! - `Corpus`: The shared, append-only collection of extracted texts

mod corpus;
mod crawl_state;
mod phase;

// Re-export main types
pub use corpus::{Corpus, CorpusEntry};
pub use crawl_state::{Admission, CrawlState};
pub use phase::CrawlPhase;
