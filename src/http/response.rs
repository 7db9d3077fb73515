//! HTTP response building module
//!
//! Builders for every status the server emits. Builders never panic:
//! construction failure logs and degrades to an empty response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::range::ByteRange;

/// Build 200 response for the rendered page
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 response for a static asset, with cache validators
pub fn build_asset_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 206 Partial Content response for a satisfied Range request
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    range: ByteRange,
    total_size: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = range.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(206)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header(
            "Content-Range",
            format!("bytes {}-{}/{}", range.start, range.end, total_size),
        )
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_not_modified_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type, Range")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 403 Forbidden response (path traversal rejection)
pub fn build_403_response() -> Response<Full<Bytes>> {
    build_plain_text_response(403, "403 Forbidden")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_plain_text_response(404, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Content-Length", "405 Method Not Allowed".len())
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_plain_text_response(413, "413 Payload Too Large")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain")
        .header("Content-Length", "416 Range Not Satisfiable".len())
        .header("Content-Range", format!("bytes */{file_size}"))
        .body(Full::new(Bytes::from("416 Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::from("416 Range Not Satisfiable")))
        })
}

/// Build 500 Internal Server Error response (template failure)
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_plain_text_response(500, "500 Internal Server Error")
}

fn build_plain_text_response(status: u16, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Content-Length", body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::from(body)))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_response() {
        let resp = build_html_response("<html></html>".to_string(), false);
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(resp.headers().get("content-length").unwrap(), "13");
    }

    #[test]
    fn test_head_suppresses_body_but_keeps_length() {
        let resp = build_html_response("<html></html>".to_string(), true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("content-length").unwrap(), "13");
    }

    #[test]
    fn test_asset_response_has_validators() {
        let resp = build_asset_response(Bytes::from_static(b"data"), "image/png", "\"e1\"", false);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("etag").unwrap(), "\"e1\"");
        assert_eq!(resp.headers().get("accept-ranges").unwrap(), "bytes");
    }

    #[test]
    fn test_partial_response_content_range() {
        let range = ByteRange { start: 2, end: 5 };
        let resp = build_partial_response(
            Bytes::from_static(b"cdef"),
            "application/octet-stream",
            "\"e1\"",
            range,
            10,
            false,
        );
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers().get("content-range").unwrap(), "bytes 2-5/10");
        assert_eq!(resp.headers().get("content-length").unwrap(), "4");
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(build_403_response().status(), 403);
        assert_eq!(build_404_response().status(), 404);
        assert_eq!(build_405_response().status(), 405);
        assert_eq!(build_413_response().status(), 413);
        assert_eq!(build_416_response(10).status(), 416);
        assert_eq!(build_500_response().status(), 500);
    }

    #[test]
    fn test_options_with_cors() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), 204);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        let resp = build_options_response(false);
        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }
}
