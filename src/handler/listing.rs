//! Listing page handler

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::AppState;
use crate::http;
use crate::logger;

/// Render every stored record through the listing template
pub fn serve_listing(state: &AppState) -> Response<Full<Bytes>> {
    let messages = state.store.load();

    match state.renderer.render(&messages) {
        Ok(html) => http::build_html_response(StatusCode::OK, Bytes::from(html)),
        Err(e) => {
            logger::log_error(&format!("Failed to render listing: {e}"));
            http::build_500_response()
        }
    }
}
