//! Snapshot of one entry of the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media;

/// One filesystem entry, fetched live from the store on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageItem {
    /// Absolute path within the store, always starting with `/`.
    pub pathname: String,
    /// Last path segment.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub mod_time: DateTime<Utc>,
}

impl StorageItem {
    /// Lowercased extension including the leading dot, or an empty string.
    pub fn extension(&self) -> String {
        media::extension(&self.name)
    }

    /// Whether the entry is a file with an image extension.
    pub fn is_image(&self) -> bool {
        !self.is_dir && media::is_image(&self.name)
    }
}
