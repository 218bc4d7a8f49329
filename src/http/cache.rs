//! HTTP revalidation module
//!
//! `ETag` generation and `If-None-Match` evaluation for static assets.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a length-and-hash `ETag` for a body
///
/// The value is quoted and stable for identical content, e.g. `"2a-9f86d08c"`.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Evaluate the client's `If-None-Match` header against an `ETag`
///
/// Handles comma-separated candidate lists and the `*` wildcard. Returns
/// true when the resource is unchanged and a 304 should be sent.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    let Some(candidates) = if_none_match else {
        return false;
    };
    candidates
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == etag || candidate == "*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_shape() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert!(etag.contains('-'));
    }

    #[test]
    fn test_etag_stable_per_content() {
        assert_eq!(generate_etag(b"same content"), generate_etag(b"same content"));
        assert_ne!(generate_etag(b"content a"), generate_etag(b"content b"));
    }

    #[test]
    fn test_etag_matches() {
        let etag = generate_etag(b"style");
        assert!(etag_matches(Some(&etag), &etag));
        assert!(etag_matches(Some(&format!("\"stale\", {etag}")), &etag));
        assert!(etag_matches(Some("*"), &etag));
        assert!(!etag_matches(Some("\"stale\""), &etag));
        assert!(!etag_matches(None, &etag));
    }
}
