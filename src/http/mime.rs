//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension. A
//! [`MimeTable`] layers per-server overrides on top of the default table.

use std::collections::HashMap;
use std::path::Path;

/// Get MIME Content-Type based on file extension (lowercase, without dot)
///
/// # Examples
/// ```
/// use devserve::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Some("mp4")), "video/mp4");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("csv") => "text/csv",
        Some("xml") => "application/xml",

        // JavaScript/WASM
        Some("js" | "mjs") => "text/javascript",
        Some("json" | "map") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/vnd.microsoft.icon",
        Some("webp") => "image/webp",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg" | "ogv") => "video/ogg",
        Some("mov") => "video/quicktime",

        // Audio
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",

        // Default
        _ => "application/octet-stream",
    }
}

/// Extension to Content-Type lookup with an override layer
#[derive(Debug, Clone, Default)]
pub struct MimeTable {
    overrides: HashMap<String, String>,
}

impl MimeTable {
    /// Build a table from override entries. Keys may be given with or without
    /// the leading dot and in any case.
    pub fn new(overrides: &HashMap<String, String>) -> Self {
        let overrides = overrides
            .iter()
            .map(|(ext, content_type)| {
                (
                    ext.trim_start_matches('.').to_ascii_lowercase(),
                    content_type.clone(),
                )
            })
            .collect();
        Self { overrides }
    }

    /// Content-Type for a file path: overrides first, then the default table
    pub fn content_type(&self, path: &Path) -> &str {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        if let Some(content_type) = extension
            .as_deref()
            .and_then(|ext| self.overrides.get(ext))
        {
            return content_type;
        }
        get_content_type(extension.as_deref())
    }
}
