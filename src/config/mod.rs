// Configuration module entry point
// Builds the immutable startup configuration and the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, ServerConfig};

impl Config {
    /// Build the baked-in defaults.
    ///
    /// The server takes no flags, environment variables or config file, so the
    /// builder only carries defaults. `server.root` is left empty; `load` fills it.
    pub fn defaults() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default(
                "http.server_name",
                concat!("devserve/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_default("http.mime_overrides.js", "application/javascript")?
            .build()?;

        settings.try_deserialize()
    }

    /// Defaults plus the root directory: the directory holding the executable
    pub fn load() -> Result<Self, StartupError> {
        let mut cfg = Self::defaults()?;
        cfg.server.root = entry_dir()?;
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Directory containing the running executable
fn entry_dir() -> Result<PathBuf, StartupError> {
    let exe = std::env::current_exe().map_err(|source| StartupError::Root {
        path: PathBuf::from("<current executable>"),
        source,
    })?;
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Err(StartupError::Root {
            path: exe,
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "executable has no parent directory",
            ),
        }),
    }
}
