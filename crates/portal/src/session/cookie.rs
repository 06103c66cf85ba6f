//! Session cookie parsing and formatting.

use axum::http::{HeaderMap, header};

/// Pull the session id out of the `Cookie` header(s)
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value binding the browser to a session
pub fn session_cookie(cookie_name: &str, session_id: &str, max_age_secs: u64) -> String {
    format!("{cookie_name}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value telling the browser to forget its session
pub fn clear_cookie(cookie_name: &str) -> String {
    format!("{cookie_name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; portal_sid=abc123; lang=es"),
        );
        assert_eq!(
            session_id_from_headers(&headers, "portal_sid").as_deref(),
            Some("abc123")
        );
        assert!(session_id_from_headers(&headers, "other").is_none());
    }

    #[test]
    fn test_empty_value_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("portal_sid="));
        assert!(session_id_from_headers(&headers, "portal_sid").is_none());
    }

    #[test]
    fn test_cookie_format() {
        assert_eq!(
            session_cookie("portal_sid", "xyz", 60),
            "portal_sid=xyz; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );
        assert!(clear_cookie("portal_sid").contains("Max-Age=0"));
    }
}
