//! Served directory configuration.

use serde::{Deserialize, Serialize};

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory served as the global root.
    #[serde(default = "default_root_directory")]
    pub root_directory: String,
    /// Maximum total size in bytes of one upload request.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_directory: default_root_directory(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_root_directory() -> String {
    "/data".to_string()
}

fn default_max_upload() -> u64 {
    32 * 1024 * 1024 * 32 // 1 GiB
}
