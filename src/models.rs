// Core data structures for the daetgul crawler

use serde::{Deserialize, Serialize};

/// A candidate article discovered by the keyword search.
///
/// Two candidates with the same `key` refer to the same underlying article
/// regardless of surface URL differences; the driver keeps the first one seen.
/// Field order matches the CSV column order of the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCandidate {
    /// Search day in `YYYY.MM.DD` format
    pub date: String,
    /// Keyword the search was run with
    pub keyword: String,
    /// Article title (from the anchor's title attribute, or its text)
    pub title: String,
    /// Article URL as found on the result page
    pub link: String,
    /// Deduplication key, `{oid}_{aid}`
    pub key: String,
}

/// One collected comment.
///
/// Comments with empty contents never become records; that is a filtering
/// rule of the collector, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// URL of the article the comment belongs to
    pub article_link: String,
    /// Opaque comment identifier from the backend
    pub comment_id: String,
    /// Display name of the comment author
    pub author: String,
    /// Comment text with newlines normalized to spaces
    pub contents: String,
    /// Like count
    pub sympathy_count: i64,
    /// Dislike count
    pub antipathy_count: i64,
    /// Registration date, first 10 characters of the backend timestamp
    pub date: String,
}

/// Counters for one link-collection run.
///
/// Per-day failures are recoverable and never abort the range; these
/// counters keep them observable in the run summary.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CrawlStats {
    /// Days that returned a result page
    pub days_crawled: usize,
    /// Days skipped after a fetch failure
    pub days_failed: usize,
    /// Candidates kept after filtering and deduplication
    pub candidates_kept: usize,
    /// Candidates dropped because their key was already seen
    pub duplicates_skipped: usize,
    /// Candidates dropped because the title did not contain the keyword
    pub title_misses: usize,
}

/// Counters for one comment-collection run
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CommentRunStats {
    /// Articles that yielded at least one comment
    pub articles_collected: usize,
    /// Articles skipped (no key, below threshold, or aborted empty)
    pub articles_skipped: usize,
    /// Total comment records collected
    pub comments_collected: usize,
}
