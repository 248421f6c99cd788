//! File classification by extension.

/// Extensions of image files; uploads matching these trigger a thumbnail.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".svg", ".tiff"];

/// Image extensions a raster thumbnail can actually be produced for.
pub const THUMBNAIL_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".tiff"];

/// Directory names never descended into by a thumbnail walk.
pub const IGNORED_WALK_DIRECTORIES: &[&str] = &[".git", "vendor", "vendors", "node_modules"];

/// Lowercased extension of `name` including the leading dot.
pub fn extension(name: &str) -> String {
    match name.rfind('.') {
        Some(index) if index > 0 => name[index..].to_lowercase(),
        _ => String::new(),
    }
}

/// Whether `name` carries an image extension.
pub fn is_image(name: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&extension(name).as_str())
}

/// Whether a thumbnail can be generated for `name`.
pub fn can_have_thumbnail(name: &str) -> bool {
    THUMBNAIL_EXTENSIONS.contains(&extension(name).as_str())
}

/// Guess MIME type from a file name extension.
pub fn mime_type(name: &str) -> &'static str {
    match extension(name).trim_start_matches('.') {
        "txt" => "text/plain; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "md" => "text/markdown; charset=utf-8",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "tiff" => "image/tiff",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}
