//! HTTP fetcher with request spacing and EUC-KR fallback decoding
//!
//! One fetcher instance wraps a reqwest client with a fixed timeout, a
//! minimum inter-request spacing, and retry with exponential backoff for
//! retryable server statuses. The spacing is enforced as a floor before each
//! request; a zero delay disables it (used by tests).

use crate::crawler::headers;
use crate::utils::error::FetchError;
use encoding_rs::{EUC_KR, UTF_8};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use std::time::Duration;

/// HTTP fetcher for Naver endpoints
pub struct NaverFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Minimum-spacing limiter; `None` when the delay is zero
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,

    /// Maximum number of retry attempts for failed requests
    max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    base_delay_ms: u64,

    /// User agent override; rotated mobile agents when unset
    user_agent: Option<String>,
}

impl NaverFetcher {
    /// Create a fetcher with the given timeout and inter-request spacing
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(timeout: Duration, request_delay: Duration) -> Result<Self, FetchError> {
        Self::with_config(timeout, request_delay, 2, None)
    }

    /// Create a fetcher with full configuration
    ///
    /// # Arguments
    ///
    /// * `timeout` - Request timeout duration
    /// * `request_delay` - Minimum spacing between requests (zero disables)
    /// * `max_retries` - Maximum number of retry attempts
    /// * `user_agent` - User agent override
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(
        timeout: Duration,
        request_delay: Duration,
        max_retries: u32,
        user_agent: Option<String>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let limiter = Quota::with_period(request_delay).map(RateLimiter::direct);

        Ok(Self {
            client,
            limiter,
            max_retries,
            base_delay_ms: 1000,
            user_agent,
        })
    }

    /// Fetch a URL and decode the body as text.
    ///
    /// When `referer` is set the request carries the comment-API header set
    /// (XHR accept plus the legacy-article Referer); otherwise the mobile
    /// search header set.
    ///
    /// # Errors
    ///
    /// Returns various `FetchError` variants depending on the failure mode
    pub async fn fetch(&self, url: &str, referer: Option<&str>) -> Result<String, FetchError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        self.fetch_with_retry(url, referer).await
    }

    /// Fetch with exponential backoff retry logic
    async fn fetch_with_retry(&self, url: &str, referer: Option<&str>) -> Result<String, FetchError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay_ms * 2_u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let user_agent = self
                .user_agent
                .as_deref()
                .unwrap_or_else(|| headers::random_mobile_agent());
            let header_map = match referer {
                Some(r) => headers::build_comment_headers(user_agent, r),
                None => headers::build_search_headers(user_agent),
            };

            match self.client.get(url).headers(header_map).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return self.decode_response(response).await;
                    } else if Self::should_retry(status.as_u16()) {
                        last_error = Some(FetchError::ServerError(status.as_u16()));
                        continue;
                    } else {
                        return Err(FetchError::ServerError(status.as_u16()));
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(FetchError::Timeout);
                    } else {
                        last_error = Some(FetchError::Http(e));
                    }
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::MaxRetriesExceeded))
    }

    /// Determine if a status code should trigger a retry
    ///
    /// Retry on 429 and transient 5xx statuses; client errors return
    /// immediately.
    fn should_retry(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }

    /// Decode response body handling both UTF-8 and EUC-KR encodings
    async fn decode_response(&self, response: reqwest::Response) -> Result<String, FetchError> {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await?;

        self.decode_bytes(&bytes, &content_type)
    }

    /// Decode bytes to a UTF-8 string with encoding detection.
    ///
    /// Tries the Content-Type charset first, then UTF-8, then EUC-KR, which
    /// Naver still serves on legacy pages.
    pub fn decode_bytes(&self, bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
        let content_type = content_type.to_lowercase();

        if content_type.contains("charset=euc-kr") {
            return decode_euc_kr(bytes);
        }
        if content_type.contains("charset=utf-8") {
            return decode_utf8(bytes);
        }

        if let Ok(text) = decode_utf8(bytes) {
            if !text.starts_with('\u{FFFD}') {
                return Ok(text);
            }
        }

        if let Ok(text) = decode_euc_kr(bytes) {
            return Ok(text);
        }

        Err(FetchError::Decode(
            "Failed to decode content with UTF-8 or EUC-KR".to_string(),
        ))
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String, FetchError> {
    let (cow, _encoding, had_errors) = UTF_8.decode(bytes);

    if had_errors {
        return Err(FetchError::Decode("UTF-8 decoding errors".to_string()));
    }

    Ok(cow.into_owned())
}

fn decode_euc_kr(bytes: &[u8]) -> Result<String, FetchError> {
    let (cow, _encoding, had_errors) = EUC_KR.decode(bytes);

    if had_errors {
        return Err(FetchError::Decode("EUC-KR decoding errors".to_string()));
    }

    Ok(cow.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_fetcher() -> NaverFetcher {
        NaverFetcher::new(Duration::from_secs(5), Duration::ZERO).unwrap()
    }

    #[test]
    fn test_zero_delay_disables_limiter() {
        let fetcher = test_fetcher();
        assert!(fetcher.limiter.is_none());

        let throttled =
            NaverFetcher::new(Duration::from_secs(5), Duration::from_millis(500)).unwrap();
        assert!(throttled.limiter.is_some());
    }

    #[test]
    fn test_decode_utf8() {
        let fetcher = test_fetcher();
        let text = "Hello, World! 안녕하세요";
        let decoded = fetcher.decode_bytes(text.as_bytes(), "text/html; charset=utf-8");

        assert!(decoded.is_ok());
        assert_eq!(decoded.unwrap(), text);
    }

    #[test]
    fn test_decode_euc_kr() {
        let fetcher = test_fetcher();
        // "안녕하세요" in EUC-KR encoding
        let euc_kr_bytes: &[u8] = &[0xbe, 0xc8, 0xb3, 0xe7, 0xc7, 0xcf, 0xbc, 0xbc, 0xbf, 0xe4];

        let decoded = fetcher.decode_bytes(euc_kr_bytes, "text/html; charset=euc-kr");

        assert!(decoded.is_ok());
        assert_eq!(decoded.unwrap(), "안녕하세요");
    }

    #[test]
    fn test_decode_euc_kr_fallback() {
        let fetcher = test_fetcher();
        let euc_kr_bytes: &[u8] = &[0xbe, 0xc8, 0xb3, 0xe7, 0xc7, 0xcf, 0xbc, 0xbc, 0xbf, 0xe4];

        let decoded = fetcher.decode_bytes(euc_kr_bytes, "text/html");

        assert!(decoded.is_ok());
        assert_eq!(decoded.unwrap(), "안녕하세요");
    }

    #[test]
    fn test_should_retry() {
        assert!(NaverFetcher::should_retry(429));
        assert!(NaverFetcher::should_retry(500));
        assert!(NaverFetcher::should_retry(502));
        assert!(NaverFetcher::should_retry(503));
        assert!(NaverFetcher::should_retry(504));

        assert!(!NaverFetcher::should_retry(400));
        assert!(!NaverFetcher::should_retry(403));
        assert!(!NaverFetcher::should_retry(404));
        assert!(!NaverFetcher::should_retry(200));
    }
}
