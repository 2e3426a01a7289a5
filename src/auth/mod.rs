//! Shared-secret request authentication
//!
//! A single API key guards every /api/notion route. Requests present it
//! either as an `x-api-key` header (programmatic clients) or an
//! `api_key` cookie (browser sessions established via /api/auth/login).
//! When no key is configured the gateway runs open, which is the
//! intended local-development mode.

use crate::types::{Result, SignpostError};
use hyper::HeaderMap;
use tracing::debug;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_COOKIE: &str = "api_key";

/// Pull the presented key out of the header or cookie, header first
pub fn presented_key(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(value.to_string());
    }
    headers
        .get(hyper::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| cookie_value(cookies, API_KEY_COOKIE))
}

/// Extract a named value from a Cookie header. Values are
/// percent-decoded since login stores the key URL-encoded.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    for pair in cookies.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if parts.next() != Some(name) {
            continue;
        }
        let raw = parts.next().unwrap_or("");
        return Some(
            urlencoding::decode(raw)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string()),
        );
    }
    None
}

/// Gate a request. No configured key means no gate.
pub fn require_auth(headers: &HeaderMap, configured_key: Option<&str>) -> Result<()> {
    let Some(expected) = configured_key else {
        return Ok(());
    };
    match presented_key(headers) {
        Some(key) if key == expected => Ok(()),
        Some(_) => {
            debug!("Rejected request with wrong API key");
            Err(SignpostError::Unauthorized)
        }
        None => {
            debug!("Rejected request with no API key");
            Err(SignpostError::Unauthorized)
        }
    }
}

/// Session cookie for a successful login. HttpOnly, strict same-site,
/// one-day lifetime.
pub fn login_cookie(key: &str) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Strict; Max-Age=86400",
        API_KEY_COOKIE,
        urlencoding::encode(key)
    )
}

/// Expired cookie that clears the session
pub fn logout_cookie() -> String {
    format!(
        "{}=; HttpOnly; Path=/; SameSite=Strict; Max-Age=0",
        API_KEY_COOKIE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{HeaderValue, COOKIE};

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_no_configured_key_allows_everything() {
        assert!(require_auth(&HeaderMap::new(), None).is_ok());
    }

    #[test]
    fn test_header_key_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("s3cret"));
        assert!(require_auth(&headers, Some("s3cret")).is_ok());
        assert!(require_auth(&headers, Some("other")).is_err());
    }

    #[test]
    fn test_cookie_key_accepted() {
        let headers = headers_with_cookie("theme=dark; api_key=s3cret; lang=en");
        assert!(require_auth(&headers, Some("s3cret")).is_ok());
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = require_auth(&HeaderMap::new(), Some("s3cret")).unwrap_err();
        assert!(matches!(err, SignpostError::Unauthorized));
    }

    #[test]
    fn test_cookie_value_is_percent_decoded() {
        let headers = headers_with_cookie("api_key=a%2Fb%20c");
        assert_eq!(presented_key(&headers), Some("a/b c".to_string()));
    }

    #[test]
    fn test_header_takes_precedence_over_cookie() {
        let mut headers = headers_with_cookie("api_key=from-cookie");
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("from-header"));
        assert_eq!(presented_key(&headers), Some("from-header".to_string()));
    }

    #[test]
    fn test_login_cookie_shape() {
        let cookie = login_cookie("a/b");
        assert!(cookie.starts_with("api_key=a%2Fb;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(logout_cookie().contains("Max-Age=0"));
    }
}
