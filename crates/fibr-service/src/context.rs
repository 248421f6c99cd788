//! Per-request context carrying the resolved root and effective permissions.

use serde::Serialize;

use fibr_core::result::AppResult;
use fibr_core::types::Share;
use fibr_storage::path;

/// Context for the current request.
///
/// Built once by the access service, read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    /// Part of the URL path after any share prefix, starting with `/`.
    pub path: String,
    /// Directory requests resolve against: `/` or the matched share's path.
    pub root: String,
    /// `/<share id>` for shared requests, empty otherwise.
    pub share_prefix: String,
    /// The matched share, if any.
    pub share: Option<Share>,
    /// Whether entries may be listed and read.
    pub can_read: bool,
    /// Whether entries may be created, renamed or deleted.
    pub can_edit: bool,
    /// Whether shares may be created or removed.
    pub can_share: bool,
    /// Whether the owner authenticated on this request.
    pub is_authenticated: bool,
}

impl RequestContext {
    /// Context of an authenticated owner on the global root.
    pub fn owner(path: &str) -> Self {
        Self {
            path: path.to_string(),
            root: "/".to_string(),
            share_prefix: String::new(),
            share: None,
            can_read: true,
            can_edit: true,
            can_share: true,
            is_authenticated: true,
        }
    }

    /// Context of a request arriving through `share`, with `path` already
    /// stripped of the share prefix.
    pub fn shared(share: &Share, path: &str, is_authenticated: bool) -> Self {
        Self {
            path: path.to_string(),
            root: share.path.clone(),
            share_prefix: format!("/{}", share.id),
            share: Some(share.clone()),
            can_read: true,
            can_edit: is_authenticated || share.edit,
            can_share: is_authenticated,
            is_authenticated,
        }
    }

    /// Validated store pathname targeted by the request.
    pub fn pathname(&self) -> AppResult<String> {
        path::resolver::pathname(&self.root, &self.path, None)
    }

    /// Request-relative form of a store pathname under this context's root.
    pub fn relative(&self, pathname: &str) -> String {
        path::relative_to(pathname, &self.root)
    }

    /// Public URL path of a store pathname, including the share prefix.
    pub fn uri(&self, pathname: &str) -> String {
        let relative = self.relative(pathname);
        if relative == "/" && !self.share_prefix.is_empty() {
            return format!("{}/", self.share_prefix);
        }
        format!("{}{}", self.share_prefix, relative)
    }

    /// Whether the request path designates a directory (trailing separator).
    pub fn is_directory_path(&self) -> bool {
        self.path.ends_with('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(edit: bool) -> Share {
        Share {
            id: "abc".to_string(),
            path: "/photos".to_string(),
            edit,
            password: String::new(),
            expiration: None,
        }
    }

    #[test]
    fn test_shared_permissions() {
        let ctx = RequestContext::shared(&share(false), "/", false);
        assert!(ctx.can_read);
        assert!(!ctx.can_edit);
        assert!(!ctx.can_share);

        let ctx = RequestContext::shared(&share(true), "/", false);
        assert!(ctx.can_edit);
        assert!(!ctx.can_share);

        let ctx = RequestContext::shared(&share(false), "/", true);
        assert!(ctx.can_edit);
        assert!(ctx.can_share);
    }

    #[test]
    fn test_pathname_and_uri() {
        let ctx = RequestContext::shared(&share(false), "/2024/beach.jpg", false);
        assert_eq!(ctx.pathname().unwrap(), "/photos/2024/beach.jpg");
        assert_eq!(ctx.relative("/photos/2024"), "/2024");
        assert_eq!(ctx.uri("/photos/2024"), "/abc/2024");
        assert_eq!(ctx.uri("/photos"), "/abc/");

        let ctx = RequestContext::owner("/docs/");
        assert_eq!(ctx.pathname().unwrap(), "/docs");
        assert_eq!(ctx.uri("/docs"), "/docs");
        assert!(ctx.is_directory_path());
    }
}
