//! Path handling: normalization, traversal detection, name sanitization and
//! resolution of request paths against a root.

pub mod resolver;
pub mod sanitize;

use percent_encoding::percent_decode_str;

use fibr_core::METADATA_DIRECTORY_NAME;

pub use resolver::{PathResolver, Resolved};
pub use sanitize::sanitize_name;

/// Parent-directory token rejected anywhere in user input.
const TRAVERSAL_TOKEN: &str = "..";

/// Whether `raw` contains a traversal token, either literally or once
/// percent-decoded.
pub fn has_traversal(raw: &str) -> bool {
    raw.contains(TRAVERSAL_TOKEN)
        || percent_decode_str(raw)
            .decode_utf8_lossy()
            .contains(TRAVERSAL_TOKEN)
}

/// Normalize a path into `/a/b` form: leading slash, no empty or `.`
/// segments, no trailing slash (except for the root itself).
///
/// `..` segments are dropped, never interpreted; callers reject them before.
pub fn clean(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != TRAVERSAL_TOKEN)
        .collect();

    format!("/{}", segments.join("/"))
}

/// Join path parts and normalize the result.
pub fn join(parts: &[&str]) -> String {
    clean(&parts.join("/"))
}

/// Parent directory of a cleaned pathname.
pub fn parent(pathname: &str) -> String {
    let cleaned = clean(pathname);
    match cleaned.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(index) => cleaned[..index].to_string(),
    }
}

/// Last segment of a cleaned pathname, empty for the root.
pub fn base(pathname: &str) -> String {
    let cleaned = clean(pathname);
    cleaned.rsplit('/').next().unwrap_or_default().to_string()
}

/// Whether a cleaned pathname lies at or below `root`.
pub fn is_within(pathname: &str, root: &str) -> bool {
    let root = clean(root);
    root == "/" || pathname == root || pathname.starts_with(&format!("{root}/"))
}

/// Form of `pathname` relative to `root`, as a caller below that root sees it.
pub fn relative_to(pathname: &str, root: &str) -> String {
    let root = clean(root);
    if root == "/" {
        return clean(pathname);
    }
    clean(pathname.strip_prefix(&root).unwrap_or(pathname))
}

/// Whether a cleaned pathname points into the reserved metadata directory.
pub fn is_reserved(pathname: &str) -> bool {
    clean(pathname).split('/').nth(1) == Some(METADATA_DIRECTORY_NAME)
}
