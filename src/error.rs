//! Error types
//!
//! `ServeError` covers everything that can go wrong while answering a single
//! request and is always turned into an HTTP status at the handler boundary.
//! `StartupError` covers the fatal failures that stop the process before the
//! accept loop runs.

use hyper::{Method, StatusCode};
use std::fmt;
use std::io::{self, ErrorKind};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Per-request failure
#[derive(Debug)]
pub enum ServeError {
    /// Nothing under the root resolves to the request path
    NotFound,
    /// Permission denied, or the path escapes the root directory
    Forbidden,
    /// Unexpected I/O failure while resolving or reading
    Internal(io::Error),
    /// Request method other than GET or HEAD
    Unsupported(Method),
}

impl ServeError {
    /// HTTP status sent to the client for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Short message shown on the error page
    pub fn message(&self) -> String {
        match self {
            Self::NotFound => "File not found".to_string(),
            Self::Forbidden => "Access to this resource is forbidden".to_string(),
            Self::Internal(_) => "Failed to read the requested resource".to_string(),
            Self::Unsupported(method) => format!("Unsupported method ('{method}')"),
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            // InvalidInput covers names with NUL bytes
            ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::InvalidInput => {
                Self::NotFound
            }
            ErrorKind::PermissionDenied => Self::Forbidden,
            _ => Self::Internal(err),
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Internal(err) => write!(f, "internal I/O error: {err}"),
            Self::Unsupported(method) => write!(f, "unsupported method: {method}"),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Internal(err) => Some(err),
            _ => None,
        }
    }
}

/// Fatal failure before the server starts accepting connections
#[derive(Debug)]
pub enum StartupError {
    /// Default configuration could not be built or deserialized
    Config(config::ConfigError),
    /// Host/port pair does not form a socket address
    Address(String),
    /// Root directory is missing or inaccessible
    Root { path: PathBuf, source: io::Error },
    /// Listener could not be bound, usually because the port is taken
    Bind { addr: SocketAddr, source: io::Error },
    /// Tokio runtime could not be created
    Runtime(io::Error),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "Invalid configuration: {err}"),
            Self::Address(msg) => write!(f, "{msg}"),
            Self::Root { path, source } => write!(
                f,
                "Root directory '{}' is not accessible: {source}",
                path.display()
            ),
            Self::Bind { addr, source } => write!(f, "Failed to bind {addr}: {source}"),
            Self::Runtime(err) => write!(f, "Failed to start async runtime: {err}"),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Address(_) => None,
            Self::Root { source, .. } | Self::Bind { source, .. } => Some(source),
            Self::Runtime(err) => Some(err),
        }
    }
}

impl From<config::ConfigError> for StartupError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let not_found = io::Error::from(ErrorKind::NotFound);
        assert!(matches!(ServeError::from(not_found), ServeError::NotFound));

        let denied = io::Error::from(ErrorKind::PermissionDenied);
        assert!(matches!(ServeError::from(denied), ServeError::Forbidden));

        let other = io::Error::new(ErrorKind::Other, "disk on fire");
        assert!(matches!(ServeError::from(other), ServeError::Internal(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ServeError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ServeError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ServeError::Internal(io::Error::from(ErrorKind::Other)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServeError::Unsupported(Method::POST).status(),
            StatusCode::NOT_IMPLEMENTED
        );
    }

    #[test]
    fn test_unsupported_message() {
        let err = ServeError::Unsupported(Method::DELETE);
        assert_eq!(err.message(), "Unsupported method ('DELETE')");
    }

    #[test]
    fn test_bind_error_display() {
        let err = StartupError::Bind {
            addr: "0.0.0.0:8000".parse().unwrap(),
            source: io::Error::from(ErrorKind::AddrInUse),
        };
        assert!(err.to_string().starts_with("Failed to bind 0.0.0.0:8000"));
    }
}
