//! Form handling module
//!
//! Decoding of `application/x-www-form-urlencoded` bodies and validation of
//! submitted target URLs.

use std::collections::HashMap;
use url::Url;

/// Decode a urlencoded form body into a field map
///
/// Later occurrences of a repeated field win, which is all this application
/// needs for its single `url` field.
pub fn parse_form(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

/// Check whether a submitted value is an acceptable redirect target
///
/// Only absolute `http`/`https` URLs with a host are accepted; everything
/// else (other schemes, relative paths, garbage) is rejected.
pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form() {
        let form = parse_form(b"url=https%3A%2F%2Fexample.com%2F");
        assert_eq!(form.get("url").map(String::as_str), Some("https://example.com/"));
    }

    #[test]
    fn test_parse_form_decodes_plus() {
        let form = parse_form(b"url=two+words");
        assert_eq!(form.get("url").map(String::as_str), Some("two words"));
    }

    #[test]
    fn test_parse_form_missing_field() {
        let form = parse_form(b"other=value");
        assert_eq!(form.get("url"), None);
    }

    #[test]
    fn test_accepts_http_and_https() {
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("https://example.com/path?q=1"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("mailto:someone@example.com"));
    }

    #[test]
    fn test_rejects_non_urls() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("not a url"));
    }
}
