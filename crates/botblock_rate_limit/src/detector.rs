//! Rate limit hints carried in response headers.
//!
//! BotBlock puts its rate limit metadata in the 429 body, but proxies in front of
//! it may only send a standard `Retry-After` header. The transport captures that
//! header so the classifier can fall back to it when the body has no delay.

use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Parse `Retry-After` as a number of seconds.
///
/// HTTP-date values are ignored; BotBlock only ever sends delta-seconds.
pub fn retry_after_header(headers: &HeaderMap) -> Option<u64> {
    parse_header_u64(headers, RETRY_AFTER.as_str())
}

/// Helper to parse u64 from header value.
fn parse_header_u64(headers: &HeaderMap, key: &str) -> Option<u64> {
    headers.get(key)?.to_str().ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn reads_delta_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("12"));
        assert_eq!(retry_after_header(&headers), Some(12));
    }

    #[test]
    fn ignores_http_dates() {
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after_header(&headers), None);
    }
}
