//! Static file serving module
//!
//! Serves assets from the configured static directory with ETag
//! revalidation and path-traversal protection.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a request under the static mount prefix
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    static_dir: &str,
    route_prefix: &str,
) -> Response<Full<Bytes>> {
    match load_from_directory(static_dir, ctx.path, route_prefix).await {
        Some(content) => build_asset_response(ctx, content),
        None => http::build_404_response(),
    }
}

/// Serve the favicon from the static directory
pub async fn serve_favicon(ctx: &RequestContext<'_>, static_dir: &str) -> Response<Full<Bytes>> {
    let file_name = ctx.path.trim_start_matches('/');
    let path = Path::new(static_dir).join(file_name);
    match fs::read(&path).await {
        Ok(content) => {
            let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
            build_asset_response(ctx, (content, content_type))
        }
        Err(_) => http::build_404_response(),
    }
}

/// Resolve and read a file beneath the static directory
///
/// The request path has the mount prefix stripped and is canonicalized; a
/// resolved path escaping the static root is rejected.
async fn load_from_directory(
    static_dir: &str,
    path: &str,
    route_prefix: &str,
) -> Option<(Vec<u8>, &'static str)> {
    let relative = path
        .strip_prefix(route_prefix)
        .unwrap_or(path)
        .trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let static_root = match Path::new(static_dir).canonicalize() {
        Ok(root) => root,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // A 404 for a missing asset is routine; only traversal attempts are logged
    let file_path = static_root.join(relative);
    let canonical = file_path.canonicalize().ok()?;
    if !canonical.starts_with(&static_root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            canonical.display()
        ));
        return None;
    }
    if !canonical.is_file() {
        return None;
    }

    let content = match fs::read(&canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                canonical.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build the response for a loaded asset, honoring If-None-Match
fn build_asset_response(
    ctx: &RequestContext<'_>,
    (content, content_type): (Vec<u8>, &'static str),
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&content);
    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }
    http::build_cached_response(content, content_type, &etag, ctx.is_head)
}
