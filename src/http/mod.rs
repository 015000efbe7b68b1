//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the file
//! serving logic in `handler`.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::{apply_no_cache, NoCache};
pub use response::{
    build_304_response, build_error_response, build_file_response, build_html_response,
    build_redirect_response,
};
