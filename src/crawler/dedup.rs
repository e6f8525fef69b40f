//! In-memory deduplication of article keys
//!
//! The dedup set lives for one crawl run across all days and is owned by the
//! driver loop; it is never persisted.

use std::collections::HashSet;

/// Set of article keys already seen during this run
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    /// Create an empty dedup set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key` if it has not been seen before.
    ///
    /// Returns `true` exactly once per key; every later call with the same
    /// key returns `false`. There is no removal operation.
    pub fn add_if_new(&mut self, key: &str) -> bool {
        self.seen.insert(key.to_string())
    }

    /// Number of distinct keys seen so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no keys have been seen yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
