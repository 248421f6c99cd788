//! Turns a request root, a request-relative path and an optional new name into
//! a validated pathname within the store.

use std::sync::Arc;

use tracing::warn;

use fibr_core::error::AppError;
use fibr_core::result::AppResult;
use fibr_core::traits::storage::Storage;
use fibr_core::types::StorageItem;

use super::{clean, has_traversal, is_reserved, is_within, join, relative_to};

/// Outcome of a resolution: the pathname and, when it exists, its entry.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Normalized absolute pathname within the store.
    pub pathname: String,
    /// `pathname` relative to the resolution root, safe to show to the caller.
    pub relative: String,
    /// The live entry at `pathname`, `None` when nothing exists there yet.
    pub item: Option<StorageItem>,
}

impl Resolved {
    /// Whether the pathname currently exists.
    pub fn exists(&self) -> bool {
        self.item.is_some()
    }

    /// The existing entry, or a `NotFound` error naming the relative path.
    pub fn require(self) -> AppResult<StorageItem> {
        let relative = self.relative;
        self.item.ok_or_else(|| {
            AppError::not_found(format!("Requested path does not exist {relative}"))
        })
    }
}

/// Combine `root`, `path` and an optional `name` into one pathname.
///
/// Two checks run: a syntactic traversal check on every raw input (literal
/// and percent-decoded), then a prefix check on the joined result. Either
/// failing is an authorization error. Pathnames into the reserved metadata
/// directory are refused as well.
pub fn pathname(root: &str, path: &str, name: Option<&str>) -> AppResult<String> {
    let inputs = [Some(root), Some(path), name];
    if inputs.iter().flatten().any(|input| has_traversal(input)) {
        warn!(root, path, name, "Rejected path traversal attempt");
        return Err(AppError::not_authorized());
    }

    let root = clean(root);
    let joined = match name {
        Some(name) => join(&[&root, path, name]),
        None => join(&[&root, path]),
    };

    if !is_within(&joined, &root) {
        warn!(root, pathname = joined, "Resolved path escaped its root");
        return Err(AppError::not_authorized());
    }

    if is_reserved(&joined) {
        return Err(AppError::not_authorized());
    }

    Ok(joined)
}

/// Path resolver bound to a store, fetching the entry behind a pathname.
#[derive(Debug, Clone)]
pub struct PathResolver {
    storage: Arc<dyn Storage>,
}

impl PathResolver {
    /// Create a new resolver over the given store.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Validate and join the inputs, then look the result up in the store.
    pub async fn resolve(&self, root: &str, path: &str, name: Option<&str>) -> AppResult<Resolved> {
        let pathname = pathname(root, path, name)?;
        let item = self.storage.try_info(&pathname).await?;
        Ok(Resolved {
            relative: relative_to(&pathname, root),
            pathname,
            item,
        })
    }
}
