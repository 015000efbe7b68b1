//! HTTP cache control module
//!
//! Every response leaves the server with caching disabled: [`NoCache`] wraps
//! the request handler service and stamps the no-cache header triple onto
//! whatever it returns, error pages included. The module also carries the
//! `Last-Modified` / `If-Modified-Since` helpers used by file responses.

use chrono::{DateTime, Utc};
use hyper::header::{HeaderMap, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::service::Service;
use hyper::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::time::SystemTime;

pub const NO_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate";
pub const NO_CACHE_PRAGMA: &str = "no-cache";
pub const NO_CACHE_EXPIRES: &str = "0";

/// Overwrite the caching headers so no client or intermediary stores the response
pub fn apply_no_cache(headers: &mut HeaderMap) {
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE_CONTROL));
    headers.insert(PRAGMA, HeaderValue::from_static(NO_CACHE_PRAGMA));
    headers.insert(EXPIRES, HeaderValue::from_static(NO_CACHE_EXPIRES));
}

/// Service decorator applying [`apply_no_cache`] to every response of `S`
#[derive(Debug, Clone)]
pub struct NoCache<S> {
    inner: S,
}

impl<S> NoCache<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for NoCache<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<ReqBody>) -> Self::Future {
        let fut = self.inner.call(req);
        Box::pin(async move {
            let mut response = fut.await?;
            apply_no_cache(response.headers_mut());
            Ok(response)
        })
    }
}

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    let time: DateTime<Utc> = time.into();
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP date header value
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Check whether the client's `If-Modified-Since` copy is still current
///
/// Comparison is done at second precision since HTTP dates carry no fraction.
/// Unparseable dates never match.
pub fn is_not_modified(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let modified: DateTime<Utc> = modified.into();
    modified.timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{Empty, Full};
    use hyper::body::Bytes;
    use hyper::service::service_fn;
    use std::convert::Infallible;
    use std::time::Duration;

    #[test]
    fn test_apply_no_cache() {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600"));
        apply_no_cache(&mut headers);

        assert_eq!(headers.get_all(CACHE_CONTROL).iter().count(), 1);
        assert_eq!(headers[CACHE_CONTROL], "no-store, no-cache, must-revalidate");
        assert_eq!(headers[PRAGMA], "no-cache");
        assert_eq!(headers[EXPIRES], "0");
    }

    #[tokio::test]
    async fn test_no_cache_service_decorates_errors() {
        let inner = service_fn(|_req: Request<Empty<Bytes>>| async {
            Ok::<_, Infallible>(
                Response::builder()
                    .status(500)
                    .body(Full::new(Bytes::from("boom")))
                    .unwrap(),
            )
        });
        let svc = NoCache::new(inner);

        let response = svc.call(Request::new(Empty::<Bytes>::new())).await.unwrap();
        assert_eq!(response.status(), 500);
        assert_eq!(
            response.headers()[CACHE_CONTROL],
            "no-store, no-cache, must-revalidate"
        );
        assert_eq!(response.headers()[PRAGMA], "no-cache");
        assert_eq!(response.headers()[EXPIRES], "0");
    }

    #[test]
    fn test_format_http_date() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777);
        assert_eq!(format_http_date(time), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_parse_http_date() {
        let parsed = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(parsed.timestamp(), 784_111_777);
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_is_not_modified() {
        let modified = SystemTime::UNIX_EPOCH + Duration::from_millis(784_111_777_500);
        assert!(is_not_modified(Some("Sun, 06 Nov 1994 08:49:37 GMT"), modified));
        assert!(is_not_modified(Some("Mon, 07 Nov 1994 00:00:00 GMT"), modified));
        assert!(!is_not_modified(Some("Sat, 05 Nov 1994 00:00:00 GMT"), modified));
        assert!(!is_not_modified(Some("garbage"), modified));
        assert!(!is_not_modified(None, modified));
    }
}
