//! Static file serving module
//!
//! Serves the fixed pages and arbitrary assets under the site root.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::AppState;
use crate::http::{self, form};
use crate::logger;

/// Serve a fixed HTML page with `status`
///
/// A missing page degrades to the inline plain-text 404.
pub async fn serve_page(page: &Path, status: StatusCode) -> Response<Full<Bytes>> {
    match fs::read(page).await {
        Ok(content) => http::build_html_response(status, Bytes::from(content)),
        Err(e) => {
            logger::log_warning(&format!(
                "Fixed page '{}' unavailable: {e}",
                page.display()
            ));
            http::build_404_response()
        }
    }
}

/// Serve the configured not-found page with 404
pub async fn serve_not_found(state: &AppState) -> Response<Full<Bytes>> {
    serve_page(&state.config.site.error_path(), StatusCode::NOT_FOUND).await
}

/// Serve any file under the site root, or the not-found page
pub async fn serve_asset(state: &AppState, request_path: &str) -> Response<Full<Bytes>> {
    let Some(file_path) = resolve_asset(&state.config.site.root, request_path) else {
        return serve_not_found(state).await;
    };

    match fs::read(&file_path).await {
        Ok(content) => {
            let content_type = state.content_types.content_type(&file_path);
            http::build_static_response(Bytes::from(content), &content_type)
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            serve_not_found(state).await
        }
    }
}

/// Map a request path to an existing regular file inside `root`
///
/// Returns `None` for directories, missing files, undecodable paths and
/// anything that resolves outside the root.
pub fn resolve_asset(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = form::decode_path(request_path).ok()?;
    let relative = decoded.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let root_canonical = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Site root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log at warning level
    let file_canonical = root.join(relative).canonicalize().ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    file_canonical.is_file().then_some(file_canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        stdfs::create_dir(dir.path().join("css")).unwrap();
        stdfs::write(dir.path().join("css/style.css"), "body {}").unwrap();
        stdfs::write(dir.path().join("my file.txt"), "spaces").unwrap();
        dir
    }

    #[test]
    fn test_resolve_existing_file() {
        let dir = site();
        let path = resolve_asset(dir.path(), "/css/style.css").unwrap();
        assert!(path.ends_with("css/style.css"));
    }

    #[test]
    fn test_resolve_percent_encoded() {
        let dir = site();
        assert!(resolve_asset(dir.path(), "/my%20file.txt").is_some());
    }

    #[test]
    fn test_resolve_rejects_directories_and_missing() {
        let dir = site();
        assert_eq!(resolve_asset(dir.path(), "/css"), None);
        assert_eq!(resolve_asset(dir.path(), "/css/"), None);
        assert_eq!(resolve_asset(dir.path(), "/"), None);
        assert_eq!(resolve_asset(dir.path(), "/nope.xyz"), None);
    }

    #[test]
    fn test_resolve_blocks_traversal() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("site");
        stdfs::create_dir(&root).unwrap();
        stdfs::write(outer.path().join("secret.txt"), "nope").unwrap();

        assert_eq!(resolve_asset(&root, "/../secret.txt"), None);
        assert_eq!(resolve_asset(&root, "/%2e%2e/secret.txt"), None);
    }

    #[tokio::test]
    async fn test_missing_page_is_inline_404() {
        let dir = site();
        let resp = serve_page(&dir.path().join("index.html"), StatusCode::OK).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["Content-Type"], "text/plain; charset=utf-8");
    }
}
