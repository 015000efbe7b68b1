//! Logger module
//!
//! Provides logging utilities for the server:
//! - The startup line on stdout
//! - One access line per request on stderr
//! - Error and warning lines on stderr

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

/// Write to info log
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error log
fn write_error(message: &str) {
    eprintln!("{message}");
}

/// Announce the listening URL
pub fn log_server_start(addr: &SocketAddr) {
    write_info(&format!("Serving at http://localhost:{}", addr.port()));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry) {
    write_error(&entry.format_common());
}
