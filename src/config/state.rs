// Application state module
// Read-only state shared by every connection task

use std::io;
use std::path::PathBuf;

use super::types::Config;
use crate::http::mime::MimeTable;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical form of `config.server.root`, the containment anchor
    pub root: PathBuf,
    pub mime: MimeTable,
}

impl AppState {
    /// Create `AppState`, canonicalizing the root directory
    pub fn new(config: Config) -> io::Result<Self> {
        let root = std::fs::canonicalize(&config.server.root)?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                "root is not a directory",
            ));
        }
        let mime = MimeTable::new(&config.http.mime_overrides);

        Ok(Self { config, root, mime })
    }
}
