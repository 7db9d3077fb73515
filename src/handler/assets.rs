//! Static asset serving module
//!
//! Maps URL paths below the static route onto files in the static asset
//! tree. Lookups classify their failures: a missing file is NotFound, a
//! path that tries to leave the tree is Forbidden.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::range::RangeOutcome;
use crate::http::{self, cache, mime, range};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Result of resolving a request path against the static root
#[derive(Debug)]
pub enum AssetLookup {
    /// File exists inside the root
    Found {
        content: Vec<u8>,
        content_type: &'static str,
    },
    /// Path does not resolve to a file
    Missing,
    /// Path resolves outside the static root
    Forbidden,
}

/// Serve a static asset request
pub async fn serve(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
    route_prefix: &str,
) -> Response<Full<Bytes>> {
    match locate(&state.config.resources.static_dir, ctx.path, route_prefix).await {
        AssetLookup::Found {
            content,
            content_type,
        } => build_asset_response(&content, content_type, ctx),
        AssetLookup::Missing => http::build_404_response(),
        AssetLookup::Forbidden => {
            logger::log_warning(&format!("Path traversal attempt blocked: {}", ctx.path));
            http::build_403_response()
        }
    }
}

/// Resolve a request path to a file under the static root
///
/// The canonicalized file path must stay inside the canonicalized root;
/// `..` segments and symlink escapes are classified as Forbidden.
pub async fn locate(static_dir: &str, request_path: &str, route_prefix: &str) -> AssetLookup {
    let relative = request_path
        .strip_prefix(route_prefix)
        .unwrap_or(request_path)
        .trim_start_matches('/');

    if relative.is_empty() {
        return AssetLookup::Missing;
    }

    if relative.split('/').any(|segment| segment == "..") {
        return AssetLookup::Forbidden;
    }

    let root = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return AssetLookup::Missing;
        }
    };

    // Missing files are common; only containment violations get logged
    let Ok(canonical) = root.join(relative).canonicalize() else {
        return AssetLookup::Missing;
    };
    if !canonical.starts_with(&root) {
        return AssetLookup::Forbidden;
    }

    // No directory listings
    if canonical.is_dir() {
        return AssetLookup::Missing;
    }

    match fs::read(&canonical).await {
        Ok(content) => {
            let content_type = mime::content_type_for(canonical.extension().and_then(|e| e.to_str()));
            AssetLookup::Found {
                content,
                content_type,
            }
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                canonical.display(),
                e
            ));
            AssetLookup::Missing
        }
    }
}

/// Build the asset response, honoring conditional and Range headers
fn build_asset_response(
    data: &[u8],
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return http::response::build_not_modified_response(&etag);
    }

    // Builders suppress the body on HEAD while keeping the real length
    match range::resolve_range(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Partial(byte_range) => http::response::build_partial_response(
            Bytes::from(data[byte_range.start..=byte_range.end].to_vec()),
            content_type,
            &etag,
            byte_range,
            total_size,
            ctx.is_head,
        ),
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Full => http::response::build_asset_response(
            Bytes::from(data.to_owned()),
            content_type,
            &etag,
            ctx.is_head,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    fn fixture_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("js")).expect("mkdir");
        std::fs::write(dir.path().join("js/game.js"), b"const game = {};\n").expect("write");
        std::fs::write(dir.path().join("sprites.png"), b"\x89PNG-ish").expect("write");
        dir
    }

    #[tokio::test]
    async fn test_locate_existing_file() {
        let dir = fixture_tree();
        let root = dir.path().to_str().unwrap();

        match locate(root, "/static/js/game.js", "/static/").await {
            AssetLookup::Found {
                content,
                content_type,
            } => {
                assert_eq!(content, b"const game = {};\n");
                assert_eq!(content_type, "application/javascript");
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_locate_missing_file() {
        let dir = fixture_tree();
        let root = dir.path().to_str().unwrap();

        assert!(matches!(
            locate(root, "/static/js/missing.js", "/static/").await,
            AssetLookup::Missing
        ));
    }

    #[tokio::test]
    async fn test_locate_rejects_dotdot_traversal() {
        let dir = fixture_tree();
        let root = dir.path().to_str().unwrap();

        assert!(matches!(
            locate(root, "/static/../../etc/passwd", "/static/").await,
            AssetLookup::Forbidden
        ));
        assert!(matches!(
            locate(root, "/static/js/../../../etc/passwd", "/static/").await,
            AssetLookup::Forbidden
        ));
    }

    #[tokio::test]
    async fn test_locate_directory_is_missing_not_listed() {
        let dir = fixture_tree();
        let root = dir.path().to_str().unwrap();

        assert!(matches!(
            locate(root, "/static/js", "/static/").await,
            AssetLookup::Missing
        ));
        assert!(matches!(
            locate(root, "/static/", "/static/").await,
            AssetLookup::Missing
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_locate_rejects_symlink_escape() {
        let outside = tempfile::tempdir().expect("tempdir");
        std::fs::write(outside.path().join("secret.txt"), b"keep out").expect("write");

        let dir = fixture_tree();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            dir.path().join("leak.txt"),
        )
        .expect("symlink");
        let root = dir.path().to_str().unwrap();

        assert!(matches!(
            locate(root, "/static/leak.txt", "/static/").await,
            AssetLookup::Forbidden
        ));
    }

    #[test]
    fn test_full_response_with_validators() {
        let resp = build_asset_response(b"tileset bytes", "image/png", &ctx("/static/sprites.png"));
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
        assert!(resp.headers().get("etag").is_some());
    }

    #[test]
    fn test_if_none_match_returns_304() {
        let data = b"tileset bytes";
        let etag = cache::generate_etag(data);
        let context = RequestContext {
            path: "/static/sprites.png",
            is_head: false,
            if_none_match: Some(etag.clone()),
            range_header: None,
        };

        let resp = build_asset_response(data, "image/png", &context);
        assert_eq!(resp.status(), 304);
        assert_eq!(resp.headers().get("etag").unwrap().to_str().unwrap(), etag);
    }

    #[test]
    fn test_range_request_returns_206() {
        let context = RequestContext {
            path: "/static/music.ogg",
            is_head: false,
            if_none_match: None,
            range_header: Some("bytes=0-3".to_string()),
        };

        let resp = build_asset_response(b"0123456789", "audio/ogg", &context);
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers().get("content-range").unwrap(), "bytes 0-3/10");
    }

    #[test]
    fn test_unsatisfiable_range_returns_416() {
        let context = RequestContext {
            path: "/static/music.ogg",
            is_head: false,
            if_none_match: None,
            range_header: Some("bytes=100-".to_string()),
        };

        let resp = build_asset_response(b"0123456789", "audio/ogg", &context);
        assert_eq!(resp.status(), 416);
    }
}
