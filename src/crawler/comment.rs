//! Naver News comment API client
//!
//! The comment backend speaks JSONP and pages through results with an opaque
//! continuation cursor. One call collects everything for one article: the
//! paginator walks pages strictly in cursor order and stops on the backend's
//! end-of-data signal (a missing, empty or repeated cursor), an empty page, or the
//! safety page cap. Any request-level failure aborts only the current
//! article's pagination, returning whatever was accumulated.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::crawler::fetcher::NaverFetcher;
use crate::crawler::url::ArticleKey;
use crate::models::CommentRecord;
use crate::utils::error::FetchError;

/// Comment API endpoints and fixed request parameters
pub mod api {
    /// Base URL for the comment list API
    pub const COMMENT_API_BASE: &str =
        "https://apis.naver.com/commentBox/cbox/web_naver_list_jsonp.json";

    /// Service ticket
    pub const TICKET: &str = "news";

    /// Template ID; the backend accepts this template for all sections
    pub const TEMPLATE_ID: &str = "view_politics";

    /// Comment pool
    pub const POOL: &str = "cbox5";

    /// Language
    pub const LANG: &str = "ko";

    /// Country
    pub const COUNTRY: &str = "KR";

    /// Comments per page
    pub const PAGE_SIZE: u32 = 100;

    /// Sort mode
    pub const SORT: &str = "favorite";

    /// Maximum page counter value; the loop terminates once it is exceeded,
    /// guarding against a misbehaving backend that never repeats a cursor
    pub const MAX_PAGES: u32 = 100;
}

// ============================================================================
// JSONP unwrapping
// ============================================================================

/// Extract the payload between the first `(` and the last `)` of a JSONP
/// response body. Returns `None` if either parenthesis is missing or out of
/// order.
fn jsonp_payload(text: &str) -> Option<&str> {
    let start = text.find('(')?;
    let end = text.rfind(')')?;
    if start + 1 > end {
        return None;
    }
    Some(&text[start + 1..end])
}

/// Unwrap a JSONP response body and parse the interior as `T`.
///
/// Malformed wrappers and unparseable payloads both yield `None`; absence is
/// an expected outcome here, not an exception.
///
/// # Examples
///
/// ```
/// use daetgul::crawler::comment::parse_jsonp;
///
/// let value: Option<serde_json::Value> = parse_jsonp(r#"cb({"a":1})"#);
/// assert_eq!(value.unwrap()["a"], 1);
///
/// let value: Option<serde_json::Value> = parse_jsonp("not-wrapped");
/// assert!(value.is_none());
/// ```
pub fn parse_jsonp<T: DeserializeOwned>(text: &str) -> Option<T> {
    serde_json::from_str(jsonp_payload(text)?).ok()
}

// ============================================================================
// API response structures
// ============================================================================

/// Root response from the comment API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommentApiResponse {
    /// Success status
    pub success: bool,

    /// Comment result data
    #[serde(default)]
    pub result: Option<CommentResult>,
}

/// Comment result containing the list, counts and pagination info
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResult {
    /// Comment counts
    #[serde(default)]
    pub count: CommentCount,

    /// List of comments on this page
    #[serde(default)]
    pub comment_list: Vec<RawComment>,

    /// Continuation block; absent on the last page
    #[serde(default)]
    pub more_page: Option<MorePage>,
}

/// Comment count information
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct CommentCount {
    /// Total comment count reported for the article
    #[serde(default)]
    pub total: i64,
}

/// Continuation cursor for the next page
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MorePage {
    /// Opaque cursor identifying where the next page begins
    #[serde(default)]
    pub next: Option<String>,
}

/// Raw comment entry from the API
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    /// Comment identifier; the backend sends either a number or a string
    #[serde(default, deserialize_with = "opaque_id")]
    pub comment_no: String,

    /// User display name
    #[serde(default)]
    pub user_name: String,

    /// Comment content
    #[serde(default)]
    pub contents: String,

    /// Sympathy (like) count
    #[serde(default)]
    pub sympathy_count: i64,

    /// Antipathy (dislike) count
    #[serde(default)]
    pub antipathy_count: i64,

    /// Registration timestamp, e.g. `2024-02-01T12:34:56+0900`
    #[serde(default)]
    pub reg_time: String,
}

/// Accept a JSON number or string and keep it as an opaque string
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

impl CommentRecord {
    /// Map a raw API entry to an output record.
    ///
    /// HTML entities are decoded, newlines are replaced with single spaces,
    /// and the date keeps only the first 10 characters of the backend
    /// timestamp.
    #[must_use]
    pub fn from_raw(article_link: &str, raw: &RawComment) -> Self {
        let contents = html_escape::decode_html_entities(&raw.contents)
            .replace('\n', " ");

        Self {
            article_link: article_link.to_string(),
            comment_id: raw.comment_no.clone(),
            author: raw.user_name.clone(),
            contents,
            sympathy_count: raw.sympathy_count,
            antipathy_count: raw.antipathy_count,
            date: raw.reg_time.chars().take(10).collect(),
        }
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// The two request shapes of the pagination protocol.
///
/// The first page initializes the comment box and carries an empty page-type
/// marker; every later page is a "more" request carrying the current cursor.
enum PageRequest<'a> {
    /// Iteration 0
    First,
    /// Iterations after the first, with the cursor to continue from
    More { cursor: &'a str },
}

/// Comment API client
pub struct CommentClient {
    fetcher: NaverFetcher,
    api_base: String,
}

impl CommentClient {
    /// Create a comment client using the production endpoint
    #[must_use]
    pub fn new(fetcher: NaverFetcher) -> Self {
        Self {
            fetcher,
            api_base: api::COMMENT_API_BASE.to_string(),
        }
    }

    /// Override the API endpoint, for testing against a mock server
    #[must_use]
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.to_string();
        self
    }

    /// Build the request URL for one page
    fn build_page_url(&self, key: &ArticleKey, request: &PageRequest) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&self.api_base).map_err(|_| FetchError::InvalidUrl(self.api_base.clone()))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("ticket", api::TICKET)
                .append_pair("templateId", api::TEMPLATE_ID)
                .append_pair("pool", api::POOL)
                .append_pair("lang", api::LANG)
                .append_pair("country", api::COUNTRY)
                .append_pair("objectId", &key.object_id())
                .append_pair("pageSize", &api::PAGE_SIZE.to_string())
                .append_pair("sort", api::SORT)
                .append_pair("includeAllStatus", "true");

            match request {
                PageRequest::First => {
                    pairs
                        .append_pair("pageType", "")
                        .append_pair("initialize", "true");
                }
                PageRequest::More { cursor } => {
                    pairs
                        .append_pair("pageType", "more")
                        .append_pair("moreParam.next", cursor);
                }
            }
        }

        Ok(url)
    }

    /// Collect all comments for one article.
    ///
    /// Returns an empty vector when the address carries no article id, when
    /// the reported total is below `min_count` (the already-fetched first
    /// page is discarded entirely in that case), or when the first request
    /// fails. Failures after the first page return the comments accumulated
    /// so far; they never propagate to the caller.
    pub async fn collect_article(&self, article_url: &str, min_count: i64) -> Vec<CommentRecord> {
        let Some(key) = ArticleKey::from_url(article_url) else {
            tracing::debug!(url = article_url, "No article id in address, skipping");
            return Vec::new();
        };

        let referer = key.legacy_url();
        let mut records: Vec<CommentRecord> = Vec::new();
        let mut cursor = String::new();
        let mut page_count: u32 = 0;

        loop {
            let request = if page_count == 0 {
                PageRequest::First
            } else {
                PageRequest::More { cursor: &cursor }
            };

            let url = match self.build_page_url(&key, &request) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(url = article_url, error = %e, "Bad comment API base");
                    break;
                }
            };

            let body = match self.fetcher.fetch(url.as_str(), Some(&referer)).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        url = article_url,
                        page = page_count,
                        error = %e,
                        "Comment fetch failed, keeping partial results"
                    );
                    break;
                }
            };

            let Some(response) = parse_jsonp::<CommentApiResponse>(&body) else {
                tracing::warn!(url = article_url, page = page_count, "Unparseable JSONP response");
                break;
            };

            if !response.success {
                tracing::warn!(url = article_url, page = page_count, "Comment API reported failure");
                break;
            }

            let result = response.result.unwrap_or_default();

            // Threshold gate, first page only: below-threshold articles are
            // skipped entirely, first page included.
            if page_count == 0 && result.count.total < min_count {
                tracing::debug!(
                    url = article_url,
                    total = result.count.total,
                    min_count,
                    "Below comment threshold, skipping article"
                );
                return Vec::new();
            }

            if result.comment_list.is_empty() {
                break;
            }

            for raw in &result.comment_list {
                if raw.contents.is_empty() {
                    continue;
                }
                records.push(CommentRecord::from_raw(article_url, raw));
            }

            // A missing or empty cursor, or one identical to the cursor just
            // used, is the backend's end-of-data signal.
            match result.more_page.and_then(|m| m.next) {
                Some(next) if !next.is_empty() && next != cursor => cursor = next,
                _ => break,
            }

            page_count += 1;
            if page_count > api::MAX_PAGES {
                tracing::warn!(
                    url = article_url,
                    pages = page_count,
                    collected = records.len(),
                    "Page safety cap hit, keeping partial results"
                );
                break;
            }
        }

        tracing::debug!(
            url = article_url,
            comments = records.len(),
            pages = page_count + 1,
            "Finished comment collection for article"
        );

        records
    }
}
