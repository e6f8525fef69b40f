//! Article identifier extraction from Naver News URLs
//!
//! Every Naver article address carries a publisher id (`oid`) and an article
//! id (`aid`) in a `/article/{oid}/{aid}` path segment. The pair identifies
//! the article regardless of which surface URL variant linked to it.

use regex::Regex;
use std::sync::LazyLock;

/// Matches `/article/{oid}/{aid}` anywhere in an address
static ARTICLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/article/(\d+)/(\d+)").unwrap());

/// Publisher/article id pair extracted from an article URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleKey {
    /// Publisher ID (e.g. "001")
    pub oid: String,
    /// Article ID (e.g. "0014123456")
    pub aid: String,
}

impl ArticleKey {
    /// Extract the id pair from an article address.
    ///
    /// Returns `None` when the address carries no article path segment.
    /// That is the expected outcome for non-article links picked up by the
    /// page selector, and callers skip such inputs silently.
    ///
    /// # Examples
    ///
    /// ```
    /// use daetgul::crawler::url::ArticleKey;
    ///
    /// let key = ArticleKey::from_url("https://n.news.naver.com/article/001/0014123456").unwrap();
    /// assert_eq!(key.dedup_key(), "001_0014123456");
    /// assert!(ArticleKey::from_url("https://m.search.naver.com/search.naver").is_none());
    /// ```
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        let caps = ARTICLE_PATTERN.captures(url)?;
        Some(Self {
            oid: caps.get(1)?.as_str().to_string(),
            aid: caps.get(2)?.as_str().to_string(),
        })
    }

    /// Deduplication key, `{oid}_{aid}`
    #[must_use]
    pub fn dedup_key(&self) -> String {
        format!("{}_{}", self.oid, self.aid)
    }

    /// Legacy-format article URL, required as Referer by the comment API
    #[must_use]
    pub fn legacy_url(&self) -> String {
        format!(
            "https://news.naver.com/main/read.nhn?oid={}&aid={}",
            self.oid, self.aid
        )
    }

    /// Object identifier used by the comment API, `news{oid},{aid}`
    #[must_use]
    pub fn object_id(&self) -> String {
        format!("news{},{}", self.oid, self.aid)
    }
}
