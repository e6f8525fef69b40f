//! Crawling functionality for Naver news search and comments
//!
//! This module implements the two collection loops: day-by-day article link
//! discovery over the mobile search endpoint, and cursor-paginated comment
//! collection from the JSONP comment backend. Both run strictly
//! sequentially with a minimum inter-request spacing, and recover from
//! failures at the per-day / per-article boundary.

pub mod comment;
pub mod dedup;
pub mod fetcher;
pub mod headers;
pub mod search;
pub mod url;

pub use comment::CommentClient;
pub use dedup::Deduplicator;
pub use fetcher::NaverFetcher;
pub use search::SearchCrawler;
pub use url::ArticleKey;
