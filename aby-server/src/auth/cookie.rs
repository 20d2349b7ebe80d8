//! `AccessAdminToken` cookie handling

use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE};

pub const ADMIN_COOKIE: &str = "AccessAdminToken";

/// `Set-Cookie` value carrying a fresh admin token
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{ADMIN_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that deletes the admin cookie
pub fn clear_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Read the admin token from the cookie, falling back to `Authorization: Bearer`
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    token_from_cookies(headers).or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

fn token_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == ADMIN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_session_cookie_attributes() {
        let c = session_cookie("abc", 604800, false);
        assert_eq!(
            c,
            "AccessAdminToken=abc; HttpOnly; Path=/; SameSite=Lax; Max-Age=604800"
        );
        assert!(session_cookie("abc", 1, true).ends_with("; Secure"));
        assert!(clear_cookie(false).contains("AccessAdminToken=; "));
        assert!(clear_cookie(false).contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; AccessAdminToken=tok123; lang=rw"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_extract_from_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok456"));
        assert_eq!(extract_token(&headers).as_deref(), Some("tok456"));
    }

    #[test]
    fn test_cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("AccessAdminToken=fromcookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer frombearer"));
        assert_eq!(extract_token(&headers).as_deref(), Some("fromcookie"));
    }

    #[test]
    fn test_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("AccessAdminToken="));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(extract_token(&headers), None);
    }
}
