//! HTTP cache control module
//!
//! `ETag` generation and `If-None-Match` evaluation for static assets.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a quoted `ETag` from file content using fast hashing
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check whether the client's `If-None-Match` header matches the `ETag`
///
/// Handles a single tag, a comma-separated tag list, and the `*` wildcard.
/// Returns true when the response should be 304 Not Modified.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etags| {
        client_etags
            .split(',')
            .any(|candidate| candidate.trim() == etag || candidate.trim() == "*")
    })
}
