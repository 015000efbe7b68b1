//! Access log format module
//!
//! One line per request in Common Log Format (CLF):
//! `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`

use chrono::Local;
use hyper::{Request, Response, Version};
use std::net::SocketAddr;

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, HEAD, ...)
    pub method: String,
    /// Request URI path with query string
    pub uri: String,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: &'static str,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes, when known
    pub body_bytes: Option<u64>,
}

impl AccessLogEntry {
    /// Start an entry from the incoming request, timestamped now
    pub fn from_request<B>(peer_addr: &SocketAddr, req: &Request<B>) -> Self {
        Self {
            remote_addr: peer_addr.ip().to_string(),
            time: Local::now(),
            method: req.method().to_string(),
            uri: req
                .uri()
                .path_and_query()
                .map_or_else(|| req.uri().path().to_string(), ToString::to_string),
            http_version: version_str(req.version()),
            status: 200,
            body_bytes: None,
        }
    }

    /// Record the outcome from the response about to be sent
    pub fn finish<B>(&mut self, response: &Response<B>) {
        self.status = response.status().as_u16();
        self.body_bytes = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
    }

    /// Common Log Format line
    pub fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.uri,
            self.http_version,
            self.status,
            self.body_bytes
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
        )
    }
}

fn version_str(version: Version) -> &'static str {
    if version == Version::HTTP_09 {
        "0.9"
    } else if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_entry() -> AccessLogEntry {
        AccessLogEntry {
            remote_addr: "192.168.1.100".to_string(),
            time: Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap(),
            method: "GET".to_string(),
            uri: "/app.js?v=2".to_string(),
            http_version: "1.1",
            status: 200,
            body_bytes: Some(1234),
        }
    }

    #[test]
    fn test_common_format() {
        let line = create_test_entry().format_common();
        assert!(line.starts_with("192.168.1.100 - - [15/Jan/2024:10:30:45 "));
        assert!(line.ends_with("] \"GET /app.js?v=2 HTTP/1.1\" 200 1234"));
    }

    #[test]
    fn test_unknown_size_is_dash() {
        let mut entry = create_test_entry();
        entry.body_bytes = None;
        entry.status = 304;
        assert!(entry.format_common().ends_with("\" 304 -"));
    }

    #[test]
    fn test_from_request_and_finish() {
        let req = Request::builder()
            .method("HEAD")
            .uri("/docs/?page=2")
            .version(Version::HTTP_10)
            .body(())
            .unwrap();
        let peer: SocketAddr = "127.0.0.1:54321".parse().unwrap();
        let mut entry = AccessLogEntry::from_request(&peer, &req);

        let response = Response::builder()
            .status(404)
            .header("Content-Length", 42)
            .body(())
            .unwrap();
        entry.finish(&response);

        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.method, "HEAD");
        assert_eq!(entry.uri, "/docs/?page=2");
        assert_eq!(entry.http_version, "1.0");
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, Some(42));
    }
}
