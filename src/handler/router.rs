//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: classifies each request into one
//! of a closed set of routes, dispatches it, and writes the access log.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::handler::{listing, static_files, submit};
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Every behavior the server can take for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `GET /`
    Home,
    /// `GET /message`
    MessageForm,
    /// `GET /read`
    Listing,
    /// Any other `GET` path, looked up under the site root
    Asset(&'a str),
    /// `POST` to any path
    Submit,
    /// Any other method
    Unsupported,
}

impl<'a> Route<'a> {
    /// Select the route for a method and URI path (query already removed)
    pub fn classify(method: &Method, path: &'a str) -> Self {
        match (method, path) {
            (&Method::GET, "/") => Self::Home,
            (&Method::GET, "/message") => Self::MessageForm,
            (&Method::GET, "/read") => Self::Listing,
            (&Method::GET, _) => Self::Asset(path),
            (&Method::POST, _) => Self::Submit,
            _ => Self::Unsupported,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let started = Instant::now();
    let mut entry = state
        .access_log
        .then(|| access_entry(&req, remote_addr));

    let path = req.uri().path().to_string();
    let route = Route::classify(req.method(), &path);
    logger::log_debug(&format!("{} {path} -> {route:?}", req.method()));

    let mut response = dispatch(route, req, &state).await;

    if let Ok(server_name) = state.config.http.server_name.parse::<HeaderValue>() {
        response.headers_mut().insert("Server", server_name);
    }

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch<B>(route: Route<'_>, req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let site = &state.config.site;
    match route {
        Route::Home => static_files::serve_page(&site.index_path(), StatusCode::OK).await,
        Route::MessageForm => static_files::serve_page(&site.message_path(), StatusCode::OK).await,
        Route::Listing => listing::serve_listing(state),
        Route::Asset(path) => static_files::serve_asset(state, path).await,
        Route::Submit => submit::handle_submit(req, state).await,
        Route::Unsupported => {
            logger::log_warning(&format!("Method not allowed: {}", req.method()));
            http::build_405_response()
        }
    }
}

fn access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_fixed_routes() {
        assert_eq!(Route::classify(&Method::GET, "/"), Route::Home);
        assert_eq!(Route::classify(&Method::GET, "/message"), Route::MessageForm);
        assert_eq!(Route::classify(&Method::GET, "/read"), Route::Listing);
    }

    #[test]
    fn test_classify_assets() {
        assert_eq!(
            Route::classify(&Method::GET, "/favicon.ico"),
            Route::Asset("/favicon.ico")
        );
        assert_eq!(
            Route::classify(&Method::GET, "/message/"),
            Route::Asset("/message/")
        );
        assert_eq!(
            Route::classify(&Method::GET, "/read.html"),
            Route::Asset("/read.html")
        );
    }

    #[test]
    fn test_classify_post_any_path() {
        assert_eq!(Route::classify(&Method::POST, "/message"), Route::Submit);
        assert_eq!(Route::classify(&Method::POST, "/"), Route::Submit);
        assert_eq!(Route::classify(&Method::POST, "/anything/else"), Route::Submit);
    }

    #[test]
    fn test_classify_other_methods() {
        assert_eq!(Route::classify(&Method::PUT, "/"), Route::Unsupported);
        assert_eq!(Route::classify(&Method::DELETE, "/read"), Route::Unsupported);
        assert_eq!(Route::classify(&Method::HEAD, "/"), Route::Unsupported);
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(Version::HTTP_10), "1.0");
        assert_eq!(version_label(Version::HTTP_11), "1.1");
        assert_eq!(version_label(Version::HTTP_2), "2");
    }
}
