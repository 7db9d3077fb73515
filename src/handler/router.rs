//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. Requests are matched against an
//! explicit route table built once at startup: an ordered list of
//! (method, path pattern) entries resolved by plain pattern matching, first
//! match wins.

use crate::config::{AppState, ResourcesConfig};
use crate::handler::{assets, pages};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Path pattern for a route table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches the path exactly
    Exact(String),
    /// Matches any path starting with the prefix (prefix ends with '/')
    Prefix(String),
}

impl PathPattern {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }

    /// The literal prefix portion of the pattern
    pub fn prefix(&self) -> &str {
        match self {
            Self::Exact(p) | Self::Prefix(p) => p,
        }
    }
}

/// What a matched route serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Rendered index template
    IndexPage,
    /// File from the static asset tree
    StaticAssets,
}

/// One route table entry
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: PathPattern,
    pub endpoint: Endpoint,
}

/// Ordered route table, built once at startup
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the table from resource configuration:
    /// `GET /` serves the page, `GET <static_route>/...` serves assets.
    pub fn from_config(resources: &ResourcesConfig) -> Self {
        Self {
            routes: vec![
                Route {
                    method: Method::GET,
                    pattern: PathPattern::Exact("/".to_string()),
                    endpoint: Endpoint::IndexPage,
                },
                Route {
                    method: Method::GET,
                    pattern: PathPattern::Prefix(normalize_prefix(&resources.static_route)),
                    endpoint: Endpoint::StaticAssets,
                },
            ],
        }
    }

    /// Find the first route matching the request
    ///
    /// HEAD resolves wherever GET does; the dispatcher suppresses the body.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<&Route> {
        let lookup = if *method == Method::HEAD {
            &Method::GET
        } else {
            method
        };

        self.routes
            .iter()
            .find(|route| route.method == *lookup && route.pattern.matches(path))
    }
}

/// Normalize a configured route prefix to `/name/` form
fn normalize_prefix(route: &str) -> String {
    let trimmed = route.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Request context passed to endpoint handlers
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    let mut response = match check_http_method(method, state.config.http.enable_cors) {
        Some(resp) => resp,
        None => match check_body_size(&req, state.config.http.max_body_size) {
            Some(resp) => resp,
            None => {
                let ctx = RequestContext {
                    path,
                    is_head,
                    if_none_match: header_string(&req, "if-none-match"),
                    range_header: header_string(&req, "range"),
                };
                dispatch(&ctx, &state).await
            }
        },
    };

    decorate_response(&mut response, &state);

    if state.config.logging.access_log {
        let entry = access_entry(&req, peer_addr, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve the route and run its endpoint handler
async fn dispatch(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    match state.routes.resolve(
        if ctx.is_head { &Method::HEAD } else { &Method::GET },
        ctx.path,
    ) {
        Some(route) => match route.endpoint {
            Endpoint::IndexPage => pages::serve_index(ctx, state),
            Endpoint::StaticAssets => assets::serve(ctx, state, route.pattern.prefix()).await,
        },
        None => http::build_404_response(),
    }
}

/// Check HTTP method and return an early response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate the Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Add the Server header (and CORS header when enabled) to every response
fn decorate_response(response: &mut Response<Full<Bytes>>, state: &Arc<AppState>) {
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert("server", value);
    }
    if state.config.http.enable_cors {
        response
            .headers_mut()
            .insert("access-control-allow-origin", HeaderValue::from_static("*"));
    }
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Build the access log entry for a finished request
fn access_entry(
    req: &Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().as_str().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resources() -> ResourcesConfig {
        ResourcesConfig {
            template_dir: "templates".to_string(),
            index_template: "index.html".to_string(),
            static_dir: "static".to_string(),
            static_route: "/static".to_string(),
        }
    }

    #[test]
    fn test_root_resolves_to_index_page() {
        let table = RouteTable::from_config(&sample_resources());
        let route = table.resolve(&Method::GET, "/").expect("route");
        assert_eq!(route.endpoint, Endpoint::IndexPage);
    }

    #[test]
    fn test_head_resolves_like_get() {
        let table = RouteTable::from_config(&sample_resources());
        let route = table.resolve(&Method::HEAD, "/").expect("route");
        assert_eq!(route.endpoint, Endpoint::IndexPage);
    }

    #[test]
    fn test_static_prefix_resolves_to_assets() {
        let table = RouteTable::from_config(&sample_resources());
        let route = table
            .resolve(&Method::GET, "/static/js/game.js")
            .expect("route");
        assert_eq!(route.endpoint, Endpoint::StaticAssets);
        assert_eq!(route.pattern.prefix(), "/static/");
    }

    #[test]
    fn test_bare_static_root_does_not_match() {
        let table = RouteTable::from_config(&sample_resources());
        assert!(table.resolve(&Method::GET, "/static").is_none());
    }

    #[test]
    fn test_unknown_path_resolves_to_none() {
        let table = RouteTable::from_config(&sample_resources());
        assert!(table.resolve(&Method::GET, "/admin").is_none());
        assert!(table.resolve(&Method::GET, "/index.html").is_none());
    }

    #[test]
    fn test_post_does_not_resolve() {
        let table = RouteTable::from_config(&sample_resources());
        assert!(table.resolve(&Method::POST, "/").is_none());
    }

    #[test]
    fn test_method_gate() {
        assert!(check_http_method(&Method::GET, false).is_none());
        assert!(check_http_method(&Method::HEAD, false).is_none());

        let options = check_http_method(&Method::OPTIONS, false).expect("response");
        assert_eq!(options.status(), 204);

        let post = check_http_method(&Method::POST, false).expect("response");
        assert_eq!(post.status(), 405);
    }

    #[test]
    fn test_prefix_normalization() {
        assert_eq!(normalize_prefix("/static"), "/static/");
        assert_eq!(normalize_prefix("/static/"), "/static/");
        assert_eq!(normalize_prefix("assets"), "/assets/");
        assert_eq!(normalize_prefix("/"), "/");
    }

    #[test]
    fn test_exact_pattern_matching() {
        let pattern = PathPattern::Exact("/".to_string());
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/static/"));
        assert!(!pattern.matches(""));
    }

    #[test]
    fn test_prefix_pattern_matching() {
        let pattern = PathPattern::Prefix("/static/".to_string());
        assert!(pattern.matches("/static/js/game.js"));
        assert!(pattern.matches("/static/"));
        assert!(!pattern.matches("/static"));
        assert!(!pattern.matches("/staticfile"));
    }
}
