use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Text extracted from one content URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub url: String,
    pub text: String,
}

impl CorpusEntry {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

/// Append-only corpus shared by the content workers
#[derive(Debug, Default)]
pub struct Corpus {
    entries: Mutex<Vec<CorpusEntry>>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CorpusEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, entry: CorpusEntry) {
        self.lock().push(entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies out the entries collected so far
    ///
    /// Workers still running after the coordinator finishes may append
    /// later; those entries are not part of the snapshot.
    pub fn snapshot(&self) -> Vec<CorpusEntry> {
        self.lock().clone()
    }
}
