//! Static file serving module
//!
//! Maps request paths onto the root directory, enforces containment, handles
//! index files and directory listings, and loads file content.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, response::escape_html};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Characters escaped in listing links (path segment set)
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// What a request path resolved to
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Regular file, canonical path
    File(PathBuf),
    /// Directory without an index file, canonical path
    Listing(PathBuf),
    /// Directory requested without the trailing slash
    Redirect,
}

/// Serve the request path from the root directory
pub async fn serve(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ServeError> {
    match resolve(&state.root, ctx.path, &state.config.http.index_files).await? {
        Resolved::File(path) => serve_file(ctx, state, &path).await,
        Resolved::Listing(dir) => {
            let html = render_listing(&dir, &decode_path(ctx.path)?).await?;
            Ok(http::build_html_response(html, ctx.is_head))
        }
        Resolved::Redirect => {
            // collapse leading slashes so `//host` can't become a protocol-relative URL
            let path = ctx.path.trim_start_matches('/');
            let location = match ctx.query {
                Some(query) => format!("/{path}/?{query}"),
                None => format!("/{path}/"),
            };
            Ok(http::build_redirect_response(&location))
        }
    }
}

async fn serve_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    path: &Path,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let modified = fs::metadata(path).await?.modified().ok();

    // If-None-Match takes precedence; no ETags are issued so it never matches
    if !ctx.has_if_none_match {
        if let Some(modified) = modified {
            if cache::is_not_modified(ctx.if_modified_since.as_deref(), modified) {
                return Ok(http::build_304_response(modified));
            }
        }
    }

    let content = fs::read(path).await?;
    let content_type = state.mime.content_type(path);

    Ok(http::build_file_response(
        Bytes::from(content),
        content_type,
        modified,
        ctx.is_head,
    ))
}

/// Resolve a raw request path (still percent-encoded) against `root`.
///
/// `root` must already be canonical.
pub async fn resolve(
    root: &Path,
    request_path: &str,
    index_files: &[String],
) -> Result<Resolved, ServeError> {
    let candidate = build_request_path(root, request_path)?;
    let target = canonicalize_within(root, &candidate, request_path).await?;
    let metadata = fs::metadata(&target).await?;

    if metadata.is_dir() {
        if !request_path.ends_with('/') {
            return Ok(Resolved::Redirect);
        }
        for index_file in index_files {
            let index_path = target.join(index_file);
            match fs::metadata(&index_path).await {
                Ok(meta) if meta.is_file() => {
                    let index_path = canonicalize_within(root, &index_path, request_path).await?;
                    return Ok(Resolved::File(index_path));
                }
                _ => {}
            }
        }
        return Ok(Resolved::Listing(target));
    }

    // A file can't be addressed as a directory
    if request_path.ends_with('/') {
        return Err(ServeError::NotFound);
    }
    Ok(Resolved::File(target))
}

/// Percent-decode the request path
fn decode_path(request_path: &str) -> Result<String, ServeError> {
    percent_decode_str(request_path)
        .decode_utf8()
        .map(|p| p.into_owned())
        .map_err(|_| ServeError::NotFound)
}

/// Join the decoded request path onto `root`, one normal component at a time.
///
/// `..` and anything that would re-anchor the path (root or drive prefix)
/// is refused rather than normalized away.
pub fn build_request_path(root: &Path, request_path: &str) -> Result<PathBuf, ServeError> {
    let decoded = decode_path(request_path.trim_start_matches('/'))?;

    let mut path = root.to_path_buf();
    for component in Path::new(&decoded).components() {
        match component {
            Component::Normal(part) => {
                // protect against segments like `c:` on Windows
                if Path::new(part)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
                {
                    path.push(part);
                } else {
                    return Err(ServeError::Forbidden);
                }
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
                return Err(ServeError::Forbidden);
            }
        }
    }
    Ok(path)
}

/// Canonicalize `path` and make sure it did not leave `root` (e.g. via symlink)
async fn canonicalize_within(
    root: &Path,
    path: &Path,
    request_path: &str,
) -> Result<PathBuf, ServeError> {
    let canonical = fs::canonicalize(path).await?;
    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        ));
        Err(ServeError::Forbidden)
    }
}

/// Render the HTML listing of `dir`, shown as `display_path`
pub async fn render_listing(dir: &Path, display_path: &str) -> Result<String, ServeError> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        // follows symlinks, broken links count as files
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        entries.push((name, is_dir, is_symlink));
    }
    entries.sort_by_key(|(name, _, _)| name.to_lowercase());

    let rows: Vec<String> = entries
        .iter()
        .map(|(name, is_dir, is_symlink)| {
            let mut display = name.clone();
            let mut link = name.clone();
            if *is_dir {
                display.push('/');
                link.push('/');
            }
            if *is_symlink {
                display.push('@');
            }
            format!(
                "<li><a href=\"{}\">{}</a></li>",
                utf8_percent_encode(&link, SEGMENT),
                escape_html(&display)
            )
        })
        .collect();

    let title = format!("Directory listing for {}", escape_html(display_path));
    Ok(format!(
        r#"<!DOCTYPE HTML>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
<hr>
<ul>
{}
</ul>
<hr>
</body>
</html>
"#,
        rows.join("\n")
    ))
}
