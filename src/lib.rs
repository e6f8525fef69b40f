//! daetgul - Naver News keyword and comment crawler
//!
//! Discovers articles matching a keyword over a date range via the Naver
//! mobile news search, then collects discussion comments for those articles
//! from the cursor-paginated JSONP comment backend.
//!
//! # Architecture
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Search and comment crawling with request spacing
//! - [`models`] - Core data structures
//! - [`storage`] - CSV input/output collaborators
//! - [`utils`] - Date ranges and error types
//!
//! # Example
//!
//! ```no_run
//! use daetgul::config::Config;
//! use daetgul::crawler::{Deduplicator, NaverFetcher, SearchCrawler};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let fetcher = NaverFetcher::new(config.search_timeout(), config.request_delay())?;
//!     let crawler = SearchCrawler::new(fetcher);
//!     let mut dedup = Deduplicator::new();
//!     let start = chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
//!     let end = chrono::NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
//!     let (links, stats) = crawler.collect_range("금리", start, end, &mut dedup).await;
//!     println!("kept {} links over {} days", links.len(), stats.days_crawled);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod models;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{ArticleKey, CommentClient, Deduplicator, NaverFetcher, SearchCrawler};
    pub use crate::models::{ArticleCandidate, CommentRecord, CommentRunStats, CrawlStats};
    pub use crate::utils::dates::date_range;
    pub use crate::utils::error::{CrawlerError, FetchError};
}

// Direct re-exports for convenience
pub use models::{ArticleCandidate, CommentRecord, CommentRunStats, CrawlStats};
