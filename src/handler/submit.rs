//! Form submission handler
//!
//! Validates the declared body length, decodes the form and appends it to
//! the record store.

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};

use crate::config::AppState;
use crate::http::{self, form};
use crate::logger;

/// Where the browser is sent after a successful submission
pub const REDIRECT_TARGET: &str = "/";

/// Outcome of checking the `Content-Length` header
#[derive(Debug, PartialEq, Eq)]
enum BodyLength {
    Missing,
    Invalid,
    TooLarge(u64),
    Ok,
}

fn check_body_length<B>(req: &Request<B>, max_body_size: u64) -> BodyLength {
    let Some(header) = req.headers().get("content-length") else {
        return BodyLength::Missing;
    };

    match header.to_str().ok().and_then(|s| s.trim().parse::<u64>().ok()) {
        None => BodyLength::Invalid,
        Some(size) if size > max_body_size => BodyLength::TooLarge(size),
        Some(_) => BodyLength::Ok,
    }
}

/// Accept one form submission
pub async fn handle_submit<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let max_body_size = state.config.http.max_body_size;
    match check_body_length(&req, max_body_size) {
        BodyLength::Ok => {}
        BodyLength::Missing => {
            logger::log_warning("Submission without Content-Length rejected");
            return http::build_411_response();
        }
        BodyLength::Invalid => {
            logger::log_warning("Submission with invalid Content-Length rejected");
            return http::build_400_response();
        }
        BodyLength::TooLarge(size) => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            return http::build_413_response();
        }
    }

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("Failed to read submission body: {e}"));
            return http::build_400_response();
        }
    };

    let record = match form::parse_form(&body) {
        Ok(record) => record,
        Err(e) => {
            logger::log_warning(&format!("Malformed submission: {e}"));
            return http::build_400_response();
        }
    };

    match state.store.append(record).await {
        Ok(key) => {
            logger::log_debug(&format!("Accepted submission {key}"));
            http::build_redirect_response(REDIRECT_TARGET)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to store submission: {e}"));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content_length: Option<&str>) -> Request<()> {
        let mut builder = Request::post("/message");
        if let Some(len) = content_length {
            builder = builder.header("Content-Length", len);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_check_body_length() {
        assert_eq!(check_body_length(&request(None), 10), BodyLength::Missing);
        assert_eq!(check_body_length(&request(Some("ten")), 10), BodyLength::Invalid);
        assert_eq!(check_body_length(&request(Some("-1")), 10), BodyLength::Invalid);
        assert_eq!(check_body_length(&request(Some("11")), 10), BodyLength::TooLarge(11));
        assert_eq!(check_body_length(&request(Some("10")), 10), BodyLength::Ok);
        assert_eq!(check_body_length(&request(Some("0")), 10), BodyLength::Ok);
    }
}
