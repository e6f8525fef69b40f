//! Keyword search over the Naver mobile news search endpoint
//!
//! The search is constrained to a single calendar day per request; the range
//! driver walks the days in ascending order, verifies the keyword appears in
//! the title and deduplicates by article key. A failed day is logged and
//! skipped; it never aborts the rest of the range.

use chrono::NaiveDate;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::crawler::dedup::Deduplicator;
use crate::crawler::fetcher::NaverFetcher;
use crate::crawler::url::ArticleKey;
use crate::models::{ArticleCandidate, CrawlStats};
use crate::utils::dates::date_range;
use crate::utils::error::FetchError;

/// Mobile news search endpoint
pub const SEARCH_BASE: &str = "https://m.search.naver.com/search.naver";

/// Anchors pointing at individual article pages on the result markup
static ARTICLE_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[href*="n.news.naver.com/article"]"#).expect("Invalid CSS selector")
});

/// Keyword search crawler over the mobile news search pages
pub struct SearchCrawler {
    fetcher: NaverFetcher,
    search_base: String,
}

impl SearchCrawler {
    /// Create a search crawler using the production endpoint
    #[must_use]
    pub fn new(fetcher: NaverFetcher) -> Self {
        Self {
            fetcher,
            search_base: SEARCH_BASE.to_string(),
        }
    }

    /// Override the search endpoint, for testing against a mock server
    #[must_use]
    pub fn with_search_base(mut self, base: &str) -> Self {
        self.search_base = base.to_string();
        self
    }

    /// Build the single-day search URL for a keyword
    fn build_search_url(&self, keyword: &str, day: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.search_base)
            .map_err(|_| FetchError::InvalidUrl(self.search_base.clone()))?;

        url.query_pairs_mut()
            .append_pair("where", "m_news")
            .append_pair("query", keyword)
            .append_pair("pd", "3")
            .append_pair("ds", day)
            .append_pair("de", day)
            .append_pair("sort", "1");

        Ok(url)
    }

    /// Collect raw article candidates for one keyword and one day.
    ///
    /// Emission follows the result page's DOM order; anchors without an
    /// article id are skipped silently.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the request fails after retries. The range
    /// driver treats that as a recoverable per-day failure.
    pub async fn collect_day(
        &self,
        keyword: &str,
        date: NaiveDate,
    ) -> Result<Vec<ArticleCandidate>, FetchError> {
        let day = date.format("%Y.%m.%d").to_string();
        let url = self.build_search_url(keyword, &day)?;

        tracing::debug!(keyword, day = %day, "Fetching search page");

        let html = self.fetcher.fetch(url.as_str(), None).await?;

        Ok(parse_candidates(&html, keyword, &day))
    }

    /// Collect candidates over `[start, end]`, filtered and deduplicated.
    ///
    /// Only candidates whose title contains the keyword are kept, and only
    /// the first candidate per article key (first-seen wins). Days that fail
    /// to fetch are counted and skipped.
    pub async fn collect_range(
        &self,
        keyword: &str,
        start: NaiveDate,
        end: NaiveDate,
        dedup: &mut Deduplicator,
    ) -> (Vec<ArticleCandidate>, CrawlStats) {
        let mut kept = Vec::new();
        let mut stats = CrawlStats::default();

        for date in date_range(start, end) {
            let candidates = match self.collect_day(keyword, date).await {
                Ok(candidates) => {
                    stats.days_crawled += 1;
                    candidates
                }
                Err(e) => {
                    stats.days_failed += 1;
                    tracing::warn!(
                        keyword,
                        date = %date.format("%Y.%m.%d"),
                        error = %e,
                        "Search fetch failed, skipping day"
                    );
                    continue;
                }
            };

            for candidate in candidates {
                if !candidate.title.contains(keyword) {
                    stats.title_misses += 1;
                    continue;
                }
                if !dedup.add_if_new(&candidate.key) {
                    stats.duplicates_skipped += 1;
                    continue;
                }
                kept.push(candidate);
            }
        }

        stats.candidates_kept = kept.len();

        tracing::info!(
            keyword,
            days_crawled = stats.days_crawled,
            days_failed = stats.days_failed,
            kept = stats.candidates_kept,
            duplicates = stats.duplicates_skipped,
            "Completed link collection"
        );

        (kept, stats)
    }
}

/// Extract article candidates from a search result page
fn parse_candidates(html: &str, keyword: &str, day: &str) -> Vec<ArticleCandidate> {
    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    for anchor in document.select(&ARTICLE_ANCHOR) {
        let href = anchor.value().attr("href").unwrap_or_default();

        let Some(key) = ArticleKey::from_url(href) else {
            continue;
        };

        let title = anchor
            .value()
            .attr("title")
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| anchor.text().collect::<String>().trim().to_string());

        candidates.push(ArticleCandidate {
            date: day.to_string(),
            keyword: keyword.to_string(),
            title,
            link: href.to_string(),
            key: key.dedup_key(),
        });
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidates_dom_order() {
        let html = r#"
            <div class="news_area">
                <a href="https://n.news.naver.com/article/001/0014123456" title="금리 인상 전망">기사1</a>
                <a href="https://n.news.naver.com/article/002/0014123457">두번째 금리 기사</a>
            </div>
        "#;
        let candidates = parse_candidates(html, "금리", "2024.02.01");

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].key, "001_0014123456");
        assert_eq!(candidates[0].title, "금리 인상 전망");
        assert_eq!(candidates[1].key, "002_0014123457");
        // No title attribute falls back to trimmed anchor text
        assert_eq!(candidates[1].title, "두번째 금리 기사");
    }

    #[test]
    fn test_parse_candidates_empty_title_attr_falls_back_to_text() {
        let html = r#"
            <a href="https://n.news.naver.com/article/001/0014123456" title="">금리 본문 제목</a>
        "#;
        let candidates = parse_candidates(html, "금리", "2024.02.01");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "금리 본문 제목");
    }

    #[test]
    fn test_parse_candidates_skips_keyless_anchors() {
        let html = r#"
            <a href="https://n.news.naver.com/article/main">목록</a>
            <a href="https://n.news.naver.com/article/001/0014123456" title="기사">기사</a>
        "#;
        let candidates = parse_candidates(html, "기사", "2024.02.01");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].key, "001_0014123456");
    }

    #[test]
    fn test_parse_candidates_ignores_other_anchors() {
        let html = r#"<a href="https://news.daum.net/v/123">다른 포털</a>"#;
        assert!(parse_candidates(html, "기사", "2024.02.01").is_empty());
    }

    #[test]
    fn test_build_search_url_single_day_window() {
        let fetcher = NaverFetcher::new(
            std::time::Duration::from_secs(10),
            std::time::Duration::ZERO,
        )
        .unwrap();
        let crawler = SearchCrawler::new(fetcher);
        let url = crawler.build_search_url("금리", "2024.02.01").unwrap();
        let query = url.query().unwrap();

        assert!(query.contains("where=m_news"));
        assert!(query.contains("ds=2024.02.01"));
        assert!(query.contains("de=2024.02.01"));
        assert!(query.contains("sort=1"));
        // Keyword is percent-encoded
        assert!(!query.contains("query=금리"));
        assert!(query.contains("query=%EA%B8%88%EB%A6%AC"));
    }
}
