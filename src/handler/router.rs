//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, body-size
//! limiting, path dispatch to the endpoint handlers, and access logging.

use crate::config::AppState;
use crate::handler::{forms, pages, static_files};
use crate::http;
use crate::logger;
use crate::store::shortid;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context handed to the static file handler
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Where a request path leads
#[derive(Debug, PartialEq, Eq)]
enum RouteTarget<'a> {
    /// `/` — the submission form (GET) or link creation (POST)
    NewUrl,
    /// `/<short_id>` — redirect to the stored target
    FollowLink(&'a str),
    /// `/<short_id>+` — the detail page
    LinkDetails(&'a str),
    NotFound,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let mut entry = logger::AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version_label(req.version()).to_string();
    entry.referer = header_value(&req, "referer");
    entry.user_agent = header_value(&req, "user-agent");

    let response = route_request(req, &state).await;

    entry.status = response.status().as_u16();
    entry.body_bytes = body_bytes_sent(&response);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    if state.config.logging.access_log {
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a request based on method and path
async fn route_request(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    // 1. Method gate: GET/HEAD everywhere, POST only on "/"
    match method {
        Method::GET | Method::HEAD => {}
        Method::POST if path == "/" => {}
        Method::OPTIONS => return http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            return http::build_405_response();
        }
    }

    // 2. Body size gate
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    let routes = &state.config.routes;

    // 3. Health probes
    if routes.health.enabled
        && (path == routes.health.liveness_path || path == routes.health.readiness_path)
    {
        return http::build_health_response("ok");
    }

    let ctx = RequestContext {
        path: &path,
        is_head,
        if_none_match: header_value(&req, "if-none-match"),
    };

    // 4. Favicon and the static mount
    if routes.favicon_paths.iter().any(|p| path == *p) {
        return static_files::serve_favicon(&ctx, &routes.static_dir).await;
    }
    if path.starts_with(&routes.static_prefix) {
        return static_files::serve_directory(&ctx, &routes.static_dir, &routes.static_prefix)
            .await;
    }

    // 5. Application endpoints
    if method == Method::POST {
        return create_short_link(req, state).await;
    }

    match classify_path(&path) {
        RouteTarget::NewUrl => {
            http::build_html_response(StatusCode::OK, pages::new_url_page(None, ""), is_head)
        }
        RouteTarget::FollowLink(short_id) => follow_short_link(state, short_id).await,
        RouteTarget::LinkDetails(short_id) => link_details(state, short_id, is_head).await,
        RouteTarget::NotFound => {
            http::build_html_response(StatusCode::NOT_FOUND, pages::not_found_page(), is_head)
        }
    }
}

/// Classify a request path against the application's routes
///
/// A short-id segment must decode as base-36; a trailing `+` selects the
/// detail page. Nested paths never match.
fn classify_path(path: &str) -> RouteTarget<'_> {
    if path == "/" {
        return RouteTarget::NewUrl;
    }
    let Some(segment) = path.strip_prefix('/') else {
        return RouteTarget::NotFound;
    };
    if segment.is_empty() || segment.contains('/') {
        return RouteTarget::NotFound;
    }
    if let Some(short_id) = segment.strip_suffix('+') {
        if shortid::base36_decode(short_id).is_some() {
            return RouteTarget::LinkDetails(short_id);
        }
        return RouteTarget::NotFound;
    }
    if shortid::base36_decode(segment).is_some() {
        return RouteTarget::FollowLink(segment);
    }
    RouteTarget::NotFound
}

/// Handle `POST /`: validate the submitted URL and create the short link
async fn create_short_link(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_error(&format!("Failed to read form body: {e}"));
            return http::build_500_response();
        }
    };

    let form = forms::parse_form(&body);
    let submitted = form.get("url").map_or("", String::as_str);
    if !forms::is_valid_url(submitted) {
        let page = pages::new_url_page(Some("Please enter a valid URL"), submitted);
        return http::build_html_response(StatusCode::OK, page, false);
    }

    match state.store.insert_url(submitted).await {
        Ok(short_id) => http::build_redirect_response(&format!("/{short_id}+")),
        Err(e) => {
            logger::log_error(&e);
            http::build_500_response()
        }
    }
}

/// Handle `GET /<short_id>`: redirect to the stored target
async fn follow_short_link(state: &Arc<AppState>, short_id: &str) -> Response<Full<Bytes>> {
    match state.store.resolve(short_id).await {
        Some(target) => http::build_redirect_response(&target),
        None => http::build_html_response(StatusCode::NOT_FOUND, pages::not_found_page(), false),
    }
}

/// Handle `GET /<short_id>+`: render the detail page
async fn link_details(
    state: &Arc<AppState>,
    short_id: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match state.store.resolve(short_id).await {
        Some(target) => {
            let page = pages::link_details_page(short_id, &target);
            http::build_html_response(StatusCode::OK, page, is_head)
        }
        None => http::build_html_response(StatusCode::NOT_FOUND, pages::not_found_page(), is_head),
    }
}

/// Validate the Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };
    match size_str.parse::<u64>() {
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
    }
}

/// Read a header as an owned string, dropping non-UTF-8 values
fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

/// Body size as reported by Content-Length, for access logging
fn body_bytes_sent(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_root() {
        assert_eq!(classify_path("/"), RouteTarget::NewUrl);
    }

    #[test]
    fn test_classify_follow_and_details() {
        assert_eq!(classify_path("/76jopfac7"), RouteTarget::FollowLink("76jopfac7"));
        assert_eq!(
            classify_path("/76jopfac7+"),
            RouteTarget::LinkDetails("76jopfac7")
        );
    }

    #[test]
    fn test_classify_rejects_nested_paths() {
        assert_eq!(classify_path("/a/b"), RouteTarget::NotFound);
        assert_eq!(classify_path("//abc"), RouteTarget::NotFound);
    }

    #[test]
    fn test_classify_rejects_non_base36_segments() {
        assert_eq!(classify_path("/ABC"), RouteTarget::NotFound);
        assert_eq!(classify_path("/abc def"), RouteTarget::NotFound);
        assert_eq!(classify_path("/+"), RouteTarget::NotFound);
    }

    #[test]
    fn test_http_version_label() {
        assert_eq!(http_version_label(hyper::Version::HTTP_10), "1.0");
        assert_eq!(http_version_label(hyper::Version::HTTP_11), "1.1");
        assert_eq!(http_version_label(hyper::Version::HTTP_2), "2");
    }

    fn test_state(name: &str) -> (Arc<AppState>, std::path::PathBuf) {
        let mut cfg =
            crate::config::Config::load_from("nonexistent-config").expect("defaults should load");
        let data_file = std::env::temp_dir().join(format!(
            "shortly-router-test-{}-{name}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&data_file);
        cfg.storage.data_file = data_file.to_string_lossy().into_owned();
        (Arc::new(AppState::new(cfg).expect("state")), data_file)
    }

    #[tokio::test]
    async fn test_unknown_short_id_is_not_found() {
        let (state, _data_file) = test_state("unknown-id");

        let resp = follow_short_link(&state, "zzzz").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = link_details(&state, "zzzz", false).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_known_short_id_redirects() {
        let (state, data_file) = test_state("known-id");

        let short_id = state
            .store
            .insert_url("https://example.com/")
            .await
            .expect("insert");

        let resp = follow_short_link(&state, &short_id).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get("Location").and_then(|v| v.to_str().ok()),
            Some("https://example.com/")
        );

        let resp = link_details(&state, &short_id, false).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let _ = std::fs::remove_file(data_file);
    }
}
