//! Request headers for the Naver mobile search and comment endpoints

use rand::seq::SliceRandom;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, REFERER,
    USER_AGENT,
};

/// Pool of mobile browser User-Agent strings.
///
/// The mobile search endpoint serves different, unparsable markup to desktop
/// clients, so every request must identify as a mobile browser.
pub const MOBILE_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; SM-S921N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
];

/// Pick a random mobile user agent from the pool
#[must_use]
pub fn random_mobile_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    MOBILE_USER_AGENTS
        .choose(&mut rng)
        .unwrap_or(&MOBILE_USER_AGENTS[0])
}

/// Build headers for mobile search page requests
///
/// # Examples
///
/// ```
/// use daetgul::crawler::headers::build_search_headers;
///
/// let headers = build_search_headers("Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X)");
/// assert!(headers.contains_key(reqwest::header::USER_AGENT));
/// ```
pub fn build_search_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(ua) = HeaderValue::from_str(user_agent) {
        headers.insert(USER_AGENT, ua);
    }
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(
        ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br"),
    );

    headers
}

/// Build headers for comment API (JSONP) requests.
///
/// The backend authorizes the request by its Referer, which must point at a
/// legacy-format URL of the same article.
pub fn build_comment_headers(user_agent: &str, referer: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(ua) = HeaderValue::from_str(user_agent) {
        headers.insert(USER_AGENT, ua);
    }
    if let Ok(referer_value) = HeaderValue::from_str(referer) {
        headers.insert(REFERER, referer_value);
    }
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_agent_is_from_pool() {
        for _ in 0..50 {
            let agent = random_mobile_agent();
            assert!(MOBILE_USER_AGENTS.contains(&agent));
        }
    }

    #[test]
    fn test_search_headers() {
        let headers = build_search_headers(MOBILE_USER_AGENTS[0]);
        assert!(headers.contains_key(USER_AGENT));
        assert!(headers.contains_key(ACCEPT));
        assert!(headers.contains_key(ACCEPT_LANGUAGE));
        assert!(!headers.contains_key(REFERER));
    }

    #[test]
    fn test_comment_headers_carry_referer() {
        let referer = "https://news.naver.com/main/read.nhn?oid=001&aid=0014123456";
        let headers = build_comment_headers(MOBILE_USER_AGENTS[0], referer);
        assert_eq!(headers.get(REFERER).unwrap().to_str().unwrap(), referer);
        assert_eq!(
            headers.get("x-requested-with").unwrap().to_str().unwrap(),
            "XMLHttpRequest"
        );
    }
}
