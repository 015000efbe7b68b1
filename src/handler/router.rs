//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, request context
//! extraction, static file serving and mapping of failures to error pages.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

/// Main entry point for HTTP request handling
///
/// Never fails: every [`ServeError`] becomes an error response here.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let uri = req.uri();
    let is_head = *method == Method::HEAD;

    let result = match check_http_method(method) {
        Err(err) => Err(err),
        Ok(()) => {
            let ctx = RequestContext {
                path: uri.path(),
                query: uri.query(),
                is_head,
                if_modified_since: req
                    .headers()
                    .get("if-modified-since")
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string),
                has_if_none_match: req.headers().contains_key("if-none-match"),
            };
            static_files::serve(&ctx, &state).await
        }
    };

    let mut response = result.unwrap_or_else(|err| error_response(&err, is_head));
    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }
    Ok(response)
}

/// Only GET and HEAD are served
fn check_http_method(method: &Method) -> Result<(), ServeError> {
    match method {
        &Method::GET | &Method::HEAD => Ok(()),
        _ => Err(ServeError::Unsupported(method.clone())),
    }
}

fn error_response(err: &ServeError, is_head: bool) -> Response<Full<Bytes>> {
    if let ServeError::Internal(source) = err {
        logger::log_error(&format!("Failed to serve request: {source}"));
    }
    http::build_error_response(err.status(), &err.message(), is_head)
}
