// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory all request paths are resolved against
    #[serde(default)]
    pub root: PathBuf,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    /// Files tried, in order, when a directory is requested
    pub index_files: Vec<String>,
    /// Extension (without dot) to Content-Type, consulted before the default table
    pub mime_overrides: HashMap<String, String>,
}
