//! HTTP response building module
//!
//! Provides builders for the responses the file server sends. None of them set
//! caching headers; those are applied to every response by
//! [`NoCache`](super::cache::NoCache).

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::time::SystemTime;

use super::cache::format_http_date;

/// Build 200 response carrying a file's content
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    last_modified: Option<SystemTime>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);
    if let Some(modified) = last_modified {
        builder = builder.header("Last-Modified", format_http_date(modified));
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build generic HTML response
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

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: SystemTime) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("Last-Modified", format_http_date(last_modified))
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect response (directory requested without trailing slash)
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build an HTML error page for `status`
pub fn build_error_response(
    status: StatusCode,
    message: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let html = render_error_page(status, message);
    let content_length = html.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(html)
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut response = Response::new(Full::new(Bytes::new()));
            *response.status_mut() = status;
            response
        })
}

fn render_error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        r#"<!DOCTYPE HTML>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Error response</title>
</head>
<body>
<h1>Error response</h1>
<p>Error code: {code}</p>
<p>Message: {message}.</p>
<p>Error code explanation: {code} - {reason}.</p>
</body>
</html>
"#,
        code = status.as_u16(),
        message = escape_html(message),
    )
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
