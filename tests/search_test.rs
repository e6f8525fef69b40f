//! Integration tests for the keyword search crawler using wiremock
//!
//! These tests validate link discovery, keyword verification, deduplication
//! across days and per-day failure recovery against mock search pages.

use std::time::Duration;

use chrono::NaiveDate;
use daetgul::crawler::{Deduplicator, NaverFetcher, SearchCrawler};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_crawler(server: &MockServer) -> SearchCrawler {
    let fetcher =
        NaverFetcher::with_config(Duration::from_secs(5), Duration::ZERO, 0, None).unwrap();
    SearchCrawler::new(fetcher).with_search_base(&format!("{}/search.naver", server.uri()))
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
}

fn result_page(anchors: &[(&str, &str)]) -> String {
    let links: String = anchors
        .iter()
        .map(|(href, title)| format!(r#"<a href="{href}" title="{title}">{title}</a>"#))
        .collect();
    format!("<!DOCTYPE html><html><body><div class=\"news_area\">{links}</div></body></html>")
}

#[tokio::test]
async fn test_collect_day_extracts_candidates() {
    let mock_server = MockServer::start().await;
    let html = result_page(&[
        ("https://n.news.naver.com/article/001/0014000001", "금리 인상 전망"),
        ("https://n.news.naver.com/article/002/0014000002", "금리 동결 분석"),
    ]);

    Mock::given(method("GET"))
        .and(path("/search.naver"))
        .and(query_param("ds", "2024.02.01"))
        .and(query_param("de", "2024.02.01"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&mock_server)
        .await;

    let crawler = test_crawler(&mock_server);
    let candidates = crawler.collect_day("금리", day(1)).await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].key, "001_0014000001");
    assert_eq!(candidates[0].date, "2024.02.01");
    assert_eq!(candidates[0].keyword, "금리");
    assert_eq!(candidates[1].key, "002_0014000002");
}

/// Two days with overlapping keys: {A,B} then {B,C} must accumulate exactly
/// {A,B,C} with B's record taken from day 1
#[tokio::test]
async fn test_collect_range_dedup_first_seen_wins() {
    let mock_server = MockServer::start().await;

    let day1 = result_page(&[
        ("https://n.news.naver.com/article/001/0014000001", "금리 기사 A"),
        ("https://n.news.naver.com/article/001/0014000002", "금리 기사 B (첫날)"),
    ]);
    let day2 = result_page(&[
        ("https://n.news.naver.com/article/001/0014000002", "금리 기사 B (둘째날)"),
        ("https://n.news.naver.com/article/001/0014000003", "금리 기사 C"),
    ]);

    Mock::given(method("GET"))
        .and(path("/search.naver"))
        .and(query_param("ds", "2024.02.01"))
        .respond_with(ResponseTemplate::new(200).set_body_string(day1))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.naver"))
        .and(query_param("ds", "2024.02.02"))
        .respond_with(ResponseTemplate::new(200).set_body_string(day2))
        .mount(&mock_server)
        .await;

    let crawler = test_crawler(&mock_server);
    let mut dedup = Deduplicator::new();
    let (kept, stats) = crawler.collect_range("금리", day(1), day(2), &mut dedup).await;

    let keys: Vec<_> = kept.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["001_0014000001", "001_0014000002", "001_0014000003"]);

    let b = kept.iter().find(|c| c.key == "001_0014000002").unwrap();
    assert_eq!(b.title, "금리 기사 B (첫날)");
    assert_eq!(b.date, "2024.02.01");

    assert_eq!(stats.days_crawled, 2);
    assert_eq!(stats.days_failed, 0);
    assert_eq!(stats.duplicates_skipped, 1);
    assert_eq!(stats.candidates_kept, 3);
}

/// A failed day is skipped; the rest of the range is still crawled
#[tokio::test]
async fn test_collect_range_recovers_from_failed_day() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.naver"))
        .and(query_param("ds", "2024.02.01"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.naver"))
        .and(query_param("ds", "2024.02.02"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[(
            "https://n.news.naver.com/article/001/0014000009",
            "금리 기사",
        )])))
        .mount(&mock_server)
        .await;

    let crawler = test_crawler(&mock_server);
    let mut dedup = Deduplicator::new();
    let (kept, stats) = crawler.collect_range("금리", day(1), day(2), &mut dedup).await;

    assert_eq!(stats.days_failed, 1);
    assert_eq!(stats.days_crawled, 1);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].key, "001_0014000009");
}

/// Candidates whose title does not contain the keyword are dropped
#[tokio::test]
async fn test_collect_range_filters_title_misses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.naver"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[
            ("https://n.news.naver.com/article/001/0014000001", "금리 인상"),
            ("https://n.news.naver.com/article/001/0014000002", "환율 급등"),
        ])))
        .mount(&mock_server)
        .await;

    let crawler = test_crawler(&mock_server);
    let mut dedup = Deduplicator::new();
    let (kept, stats) = crawler.collect_range("금리", day(1), day(1), &mut dedup).await;

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].title, "금리 인상");
    assert_eq!(stats.title_misses, 1);
}

/// An empty result page is a crawled day with no candidates, not a failure
#[tokio::test]
async fn test_collect_range_empty_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.naver"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&mock_server)
        .await;

    let crawler = test_crawler(&mock_server);
    let mut dedup = Deduplicator::new();
    let (kept, stats) = crawler.collect_range("금리", day(1), day(1), &mut dedup).await;

    assert!(kept.is_empty());
    assert_eq!(stats.days_crawled, 1);
    assert_eq!(stats.days_failed, 0);
}
